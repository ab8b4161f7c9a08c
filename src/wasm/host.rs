//! Browser implementation of `EngineHost`: canvases inside the background
//! layer, window/document listeners and a `requestAnimationFrame` loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

use super::render::{lose_context, webgl2, Renderer};
use crate::config::SiteConfig;
use crate::effects::EffectConfig;
use crate::engine::{
    run_frame, CancelToken, Capability, EngineHost, InputEvent, InputKind, SharedAnimation, Viewport,
};
use crate::error::SiteError;

pub fn inner_size(window: &Window) -> Viewport {
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(read(window.inner_width()), read(window.inner_height()))
}

/// Explicit check for the 3D runtime, done once before anything mounts.
pub fn probe_webgl2(document: &Document) -> Capability {
    let canvas = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
    let Some(gl) = canvas.and_then(|c| webgl2(&c).ok()) else {
        return Capability::Unavailable;
    };
    lose_context(&gl);
    Capability::Available
}

pub struct EngineSurface {
    renderer: Renderer,
}

impl EngineSurface {
    fn detach(&self) {
        self.renderer.release();
        self.renderer.canvas().remove();
    }
}

pub struct DomListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

pub struct FrameLoop {
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

pub struct DomHost {
    window: Window,
    document: Document,
    layer: HtmlElement,
    config: SiteConfig,
    capability: Capability,
    rng: fastrand::Rng,
    listeners: usize,
}

impl DomHost {
    pub fn new(window: Window, document: Document, layer: HtmlElement, config: SiteConfig) -> Self {
        let capability = probe_webgl2(&document);
        log::info!("webgl2: {capability:?}");
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        Self {
            window,
            document,
            layer,
            config,
            capability,
            rng: fastrand::Rng::with_seed(seed),
            listeners: 0,
        }
    }

    /// Listeners currently registered on behalf of mounted engines.
    pub fn listener_count(&self) -> usize {
        self.listeners
    }

    fn read_event(window: &Window, kind: InputKind, event: &Event) -> Option<InputEvent> {
        match kind {
            InputKind::Resize => Some(InputEvent::Resize(inner_size(window))),
            InputKind::PointerMove => {
                let mouse = event.dyn_ref::<MouseEvent>()?;
                Some(InputEvent::PointerMove {
                    x: mouse.client_x() as f32,
                    y: mouse.client_y() as f32,
                })
            }
            InputKind::Scroll => {
                let body = window.document()?.body()?;
                Some(InputEvent::Scroll {
                    scroll_y: window.scroll_y().unwrap_or(0.0) as f32,
                    scroll_height: body.scroll_height() as f32,
                    inner_height: inner_size(window).height,
                })
            }
        }
    }
}

impl EngineHost for DomHost {
    type Surface = Rc<EngineSurface>;
    type Listener = DomListener;
    type Frames = FrameLoop;

    fn capability(&self) -> Capability {
        self.capability
    }

    fn viewport(&self) -> Viewport {
        inner_size(&self.window)
    }

    fn attach_surface(&mut self, effect: EffectConfig, fade_in: bool) -> Result<Self::Surface, SiteError> {
        let canvas = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SiteError::Js("canvas element has wrong type".into()))?;
        canvas.set_class_name(&format!("bg-surface bg-{}", effect.name()));
        let style = canvas.style();
        style.set_property(
            "transition",
            &format!("opacity {}ms ease", self.config.fade_ms),
        )?;
        style.set_property("opacity", if fade_in { "0" } else { "1" })?;

        let renderer = Renderer::new(canvas.clone(), effect, &self.config, &mut self.rng)?;
        self.layer.style().remove_property("background-color")?;
        self.layer.append_child(&canvas)?;

        if fade_in {
            // Reading layout commits opacity 0 so the change below transitions.
            let _ = canvas.offset_width();
            style.set_property("opacity", "1")?;
        }
        Ok(Rc::new(EngineSurface { renderer }))
    }

    fn retire_surface(&mut self, surface: Self::Surface, fade_ms: u32) {
        if fade_ms == 0 {
            surface.detach();
            return;
        }
        surface.renderer.canvas().style().set_property("opacity", "0").ok();
        let fading = surface.clone();
        let cb = Closure::once_into_js(move || fading.detach());
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), fade_ms as i32)
        {
            log::warn!("fade timer failed, removing surface now: {err:?}");
            surface.detach();
        }
    }

    fn paint_static(&mut self, css: &str) {
        if let Err(err) = self.layer.style().set_property("background-color", css) {
            log::warn!("could not paint static background: {err:?}");
        }
    }

    fn clear_static(&mut self) {
        if let Err(err) = self.layer.style().remove_property("background-color") {
            log::warn!("could not clear static background: {err:?}");
        }
    }

    fn listen(&mut self, kind: InputKind, target: SharedAnimation) -> Result<Self::Listener, SiteError> {
        let window = self.window.clone();
        let callback = Closure::wrap(Box::new(move |event: Event| {
            let Some(input) = Self::read_event(&window, kind, &event) else {
                return;
            };
            if let Ok(mut anim) = target.try_borrow_mut() {
                anim.handle(input);
            }
        }) as Box<dyn FnMut(Event)>);

        let event_target: EventTarget = match kind {
            InputKind::PointerMove => self.document.clone().into(),
            InputKind::Resize | InputKind::Scroll => self.window.clone().into(),
        };
        event_target.add_event_listener_with_callback(kind.event_name(), callback.as_ref().unchecked_ref())?;
        self.listeners += 1;
        Ok(DomListener {
            target: event_target,
            event: kind.event_name(),
            callback,
        })
    }

    fn unlisten(&mut self, listener: Self::Listener) {
        if let Err(err) = listener
            .target
            .remove_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref())
        {
            log::warn!("removing {} listener failed: {err:?}", listener.event);
        }
        self.listeners = self.listeners.saturating_sub(1);
    }

    fn start_frames(
        &mut self,
        surface: &Self::Surface,
        animation: SharedAnimation,
        token: CancelToken,
    ) -> Result<Self::Frames, SiteError> {
        // `callback` holds the animation-frame closure so that it can keep
        // calling `request_animation_frame` on itself.
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let window = self.window.clone();
        let surface = surface.clone();
        let this = callback.clone();
        let next = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            next.set(None);
            if !run_frame(&token, &animation, |anim| surface.renderer.draw(anim)) {
                return;
            }
            if let Some(f) = this.borrow().as_ref() {
                match window.request_animation_frame(f.as_ref().unchecked_ref()) {
                    Ok(id) => next.set(Some(id)),
                    Err(err) => log::warn!("frame request failed: {err:?}"),
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(f) = callback.borrow().as_ref() {
            let id = self.window.request_animation_frame(f.as_ref().unchecked_ref())?;
            pending.set(Some(id));
        }
        Ok(FrameLoop { pending, callback })
    }

    fn stop_frames(&mut self, frames: Self::Frames) {
        if let Some(id) = frames.pending.take() {
            if let Err(err) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {err:?}");
            }
        }
        // Breaks the closure's reference to itself.
        frames.callback.borrow_mut().take();
    }
}
