//! Animation engine: per-instance state, the input/frame seam it is mounted
//! through, and the mount/unmount lifecycle.
//!
//! A mounted engine owns one rendering surface, one frame loop and one
//! listener per input it consumes. Unmounting cancels the frame loop, drops
//! every listener and only then hands the surface back for detaching.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::config::SiteConfig;
use crate::effects::{EffectConfig, ShaderKind};
use crate::error::SiteError;
use crate::particles::ParticleMotion;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Resize,
    PointerMove,
    Scroll,
}

impl InputKind {
    pub fn event_name(self) -> &'static str {
        match self {
            InputKind::Resize => "resize",
            InputKind::PointerMove => "mousemove",
            InputKind::Scroll => "scroll",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Resize(Viewport),
    /// Client coordinates in CSS pixels.
    PointerMove { x: f32, y: f32 },
    Scroll {
        scroll_y: f32,
        scroll_height: f32,
        inner_height: f32,
    },
}

#[derive(Debug, Clone)]
pub struct ShaderState {
    pub kind: ShaderKind,
    pub time: f32,
    /// Pointer in uv space, y up.
    pub pointer: Vec2,
    time_step: f32,
}

#[derive(Debug, Clone)]
pub enum AnimationState {
    Particles(ParticleMotion),
    Shader(ShaderState),
}

/// Mutable state of one mounted engine. Created at mount, dropped at unmount.
#[derive(Debug, Clone)]
pub struct Animation {
    pub effect: EffectConfig,
    pub state: AnimationState,
    pub viewport: Viewport,
    pub frames: u64,
}

const PARTICLE_INPUTS: &[InputKind] = &[InputKind::Resize, InputKind::PointerMove, InputKind::Scroll];
const SHADER_INPUTS: &[InputKind] = &[InputKind::Resize, InputKind::PointerMove];

impl Animation {
    pub fn new(effect: EffectConfig, viewport: Viewport, cfg: &SiteConfig) -> Self {
        let state = match effect {
            EffectConfig::ParticleField => AnimationState::Particles(ParticleMotion::new(&cfg.particles)),
            EffectConfig::Shader(kind) => AnimationState::Shader(ShaderState {
                kind,
                time: 0.0,
                pointer: Vec2::splat(0.5),
                time_step: cfg.shader.time_step,
            }),
        };
        Self {
            effect,
            state,
            viewport,
            frames: 0,
        }
    }

    /// Inputs this engine listens to while mounted.
    pub fn inputs(&self) -> &'static [InputKind] {
        match self.state {
            AnimationState::Particles(_) => PARTICLE_INPUTS,
            AnimationState::Shader(_) => SHADER_INPUTS,
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match (event, &mut self.state) {
            (InputEvent::Resize(viewport), _) => self.viewport = viewport,
            (InputEvent::PointerMove { x, y }, AnimationState::Particles(motion)) => {
                motion.on_pointer(x, y, self.viewport.width, self.viewport.height);
            }
            (InputEvent::PointerMove { x, y }, AnimationState::Shader(shader)) => {
                if self.viewport.width > 0.0 && self.viewport.height > 0.0 {
                    shader.pointer = Vec2::new(
                        x / self.viewport.width,
                        1.0 - y / self.viewport.height,
                    );
                }
            }
            (
                InputEvent::Scroll {
                    scroll_y,
                    scroll_height,
                    inner_height,
                },
                AnimationState::Particles(motion),
            ) => motion.on_scroll(scroll_y, scroll_height, inner_height),
            (InputEvent::Scroll { .. }, AnimationState::Shader(_)) => {}
        }
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        match &mut self.state {
            AnimationState::Particles(motion) => motion.step(),
            AnimationState::Shader(shader) => shader.time += shader.time_step,
        }
        self.frames += 1;
    }
}

pub type SharedAnimation = Rc<RefCell<Animation>>;

/// Set once at unmount; the frame loop checks it before doing any work.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// One cooperative frame: step the animation and draw it, unless the token
/// has been cancelled. Returns whether the loop should be rescheduled.
pub fn run_frame<F>(token: &CancelToken, animation: &RefCell<Animation>, draw: F) -> bool
where
    F: FnOnce(&Animation),
{
    if token.is_cancelled() {
        return false;
    }
    let mut anim = animation.borrow_mut();
    anim.step();
    draw(&anim);
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable,
}

/// Everything an engine needs from its environment: a surface to draw on,
/// input subscriptions and a frame scheduler.
pub trait EngineHost {
    type Surface;
    type Listener;
    type Frames;

    /// Result of the explicit runtime check done before the first mount.
    fn capability(&self) -> Capability;
    fn viewport(&self) -> Viewport;

    fn attach_surface(&mut self, effect: EffectConfig, fade_in: bool) -> Result<Self::Surface, SiteError>;
    /// Fade the surface out and detach it once the fade completes.
    fn retire_surface(&mut self, surface: Self::Surface, fade_ms: u32);
    /// Replace any engine surface with a flat colour.
    fn paint_static(&mut self, css: &str);
    /// Remove a colour left by `paint_static`.
    fn clear_static(&mut self);

    fn listen(&mut self, kind: InputKind, target: SharedAnimation) -> Result<Self::Listener, SiteError>;
    fn unlisten(&mut self, listener: Self::Listener);

    fn start_frames(
        &mut self,
        surface: &Self::Surface,
        animation: SharedAnimation,
        token: CancelToken,
    ) -> Result<Self::Frames, SiteError>;
    fn stop_frames(&mut self, frames: Self::Frames);
}

/// A running engine instance and the host resources it holds.
pub struct MountedEngine<H: EngineHost> {
    animation: SharedAnimation,
    surface: H::Surface,
    listeners: Vec<H::Listener>,
    frames: H::Frames,
    token: CancelToken,
}

impl<H: EngineHost> MountedEngine<H> {
    pub fn mount(host: &mut H, effect: EffectConfig, cfg: &SiteConfig) -> Result<Self, SiteError> {
        let animation = Rc::new(RefCell::new(Animation::new(effect, host.viewport(), cfg)));
        let surface = host.attach_surface(effect, effect.fades_in())?;

        let mut listeners = Vec::new();
        let inputs = animation.borrow().inputs();
        for &kind in inputs {
            match host.listen(kind, animation.clone()) {
                Ok(listener) => listeners.push(listener),
                Err(err) => {
                    for listener in listeners {
                        host.unlisten(listener);
                    }
                    host.retire_surface(surface, 0);
                    return Err(err);
                }
            }
        }

        let token = CancelToken::new();
        let frames = match host.start_frames(&surface, animation.clone(), token.clone()) {
            Ok(frames) => frames,
            Err(err) => {
                for listener in listeners {
                    host.unlisten(listener);
                }
                host.retire_surface(surface, 0);
                return Err(err);
            }
        };

        log::debug!("mounted {} engine", effect.name());
        Ok(Self {
            animation,
            surface,
            listeners,
            frames,
            token,
        })
    }

    pub fn effect(&self) -> EffectConfig {
        self.animation.borrow().effect
    }

    pub fn animation(&self) -> &SharedAnimation {
        &self.animation
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Stop the frame loop and drop all listeners, then let the host fade the
    /// surface out.
    pub fn unmount(self, host: &mut H, fade_ms: u32) {
        let effect = self.effect();
        self.token.cancel();
        host.stop_frames(self.frames);
        for listener in self.listeners {
            host.unlisten(listener);
        }
        host.retire_surface(self.surface, fade_ms);
        log::debug!("unmounted {} engine", effect.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SiteConfig {
        SiteConfig::default()
    }

    #[test]
    fn shader_time_advances_by_fixed_step() {
        let mut anim = Animation::new(
            EffectConfig::Shader(ShaderKind::Grid),
            Viewport::new(800.0, 600.0),
            &cfg(),
        );
        for _ in 0..100 {
            anim.step();
        }
        let AnimationState::Shader(shader) = &anim.state else {
            panic!("expected shader state");
        };
        assert!((shader.time - 1.0).abs() < 1e-4);
        assert_eq!(anim.frames, 100);
    }

    #[test]
    fn shader_pointer_is_uv_with_y_up() {
        let mut anim = Animation::new(
            EffectConfig::Shader(ShaderKind::Ink),
            Viewport::new(800.0, 600.0),
            &cfg(),
        );
        let AnimationState::Shader(shader) = &anim.state else {
            panic!("expected shader state");
        };
        assert_eq!(shader.pointer, Vec2::splat(0.5));

        anim.handle(InputEvent::PointerMove { x: 200.0, y: 150.0 });
        let AnimationState::Shader(shader) = &anim.state else {
            panic!("expected shader state");
        };
        assert_eq!(shader.pointer, Vec2::new(0.25, 0.75));
    }

    #[test]
    fn resize_updates_viewport() {
        let mut anim = Animation::new(EffectConfig::ParticleField, Viewport::new(800.0, 600.0), &cfg());
        anim.handle(InputEvent::Resize(Viewport::new(1920.0, 1080.0)));
        assert_eq!(anim.viewport, Viewport::new(1920.0, 1080.0));
        assert!((anim.viewport.aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn only_particles_listen_to_scroll() {
        let particles = Animation::new(EffectConfig::ParticleField, Viewport::new(1.0, 1.0), &cfg());
        let shader = Animation::new(
            EffectConfig::Shader(ShaderKind::Metaballs),
            Viewport::new(1.0, 1.0),
            &cfg(),
        );
        assert!(particles.inputs().contains(&InputKind::Scroll));
        assert!(!shader.inputs().contains(&InputKind::Scroll));
        assert_eq!(particles.inputs().len(), 3);
        assert_eq!(shader.inputs().len(), 2);
    }

    #[test]
    fn scroll_reaches_particle_target_depth() {
        let mut anim = Animation::new(EffectConfig::ParticleField, Viewport::new(800.0, 600.0), &cfg());
        anim.handle(InputEvent::Scroll {
            scroll_y: 500.0,
            scroll_height: 1600.0,
            inner_height: 600.0,
        });
        let AnimationState::Particles(motion) = &anim.state else {
            panic!("expected particle state");
        };
        assert_eq!(motion.target_z, 200.0 - 0.5 * 1200.0);
    }

    #[test]
    fn no_frame_runs_after_cancel() {
        let anim = RefCell::new(Animation::new(
            EffectConfig::Shader(ShaderKind::Grid),
            Viewport::new(10.0, 10.0),
            &cfg(),
        ));
        let token = CancelToken::new();
        let mut drawn = 0;
        assert!(run_frame(&token, &anim, |_| drawn += 1));
        assert!(run_frame(&token, &anim, |_| drawn += 1));
        token.cancel();
        assert!(!run_frame(&token, &anim, |_| drawn += 1));
        assert_eq!(drawn, 2);
        assert_eq!(anim.borrow().frames, 2);
    }

    #[test]
    fn cloned_token_shares_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
