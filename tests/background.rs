use std::rc::Rc;

use glam::Vec2;

use agency_site::background::{static_colour, Backdrop, BackgroundSelector};
use agency_site::engine::{
    run_frame, AnimationState, CancelToken, Capability, EngineHost, InputEvent, InputKind, SharedAnimation, Viewport,
};
use agency_site::router::{Router, ScrollPort};
use agency_site::{effect_for, EffectConfig, PageId, ShaderKind, SiteConfig, SiteError};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Attach(usize, EffectConfig, bool),
    Listen(usize, InputKind),
    Unlisten(usize, InputKind),
    StartFrames(usize),
    StopFrames(usize),
    Retire(usize, u32),
    Static(String),
    ClearStatic,
}

struct FakeFrames {
    surface: usize,
    animation: SharedAnimation,
    token: CancelToken,
}

/// Records every host call and keeps live listeners/frame loops so tests
/// can fire events and frames at whatever is still registered.
struct FakeHost {
    capability: Capability,
    fail_on: Option<InputKind>,
    next_surface: usize,
    calls: Vec<Call>,
    listeners: Vec<(usize, InputKind, SharedAnimation)>,
    frames: Vec<(usize, SharedAnimation, CancelToken)>,
    attached: Vec<usize>,
}

impl FakeHost {
    fn new() -> Self {
        Self {
            capability: Capability::Available,
            fail_on: None,
            next_surface: 0,
            calls: Vec::new(),
            listeners: Vec::new(),
            frames: Vec::new(),
            attached: Vec::new(),
        }
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn dispatch(&self, kind: InputKind, event: InputEvent) {
        for (_, k, anim) in &self.listeners {
            if *k == kind {
                anim.borrow_mut().handle(event);
            }
        }
    }

    fn tick(&self) -> usize {
        let mut drawn = 0;
        for (_, anim, token) in &self.frames {
            run_frame(token, anim, |_| drawn += 1);
        }
        drawn
    }
}

impl EngineHost for FakeHost {
    type Surface = usize;
    type Listener = (usize, InputKind);
    type Frames = FakeFrames;

    fn capability(&self) -> Capability {
        self.capability
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    fn attach_surface(&mut self, effect: EffectConfig, fade_in: bool) -> Result<usize, SiteError> {
        let id = self.next_surface;
        self.next_surface += 1;
        self.attached.push(id);
        self.calls.push(Call::Attach(id, effect, fade_in));
        Ok(id)
    }

    fn retire_surface(&mut self, surface: usize, fade_ms: u32) {
        self.attached.retain(|&s| s != surface);
        self.calls.push(Call::Retire(surface, fade_ms));
    }

    fn paint_static(&mut self, css: &str) {
        self.calls.push(Call::Static(css.to_string()));
    }

    fn clear_static(&mut self) {
        self.calls.push(Call::ClearStatic);
    }

    fn listen(&mut self, kind: InputKind, target: SharedAnimation) -> Result<Self::Listener, SiteError> {
        if self.fail_on == Some(kind) {
            return Err(SiteError::Js(format!("cannot listen to {}", kind.event_name())));
        }
        let surface = self.next_surface - 1;
        self.listeners.push((surface, kind, target));
        self.calls.push(Call::Listen(surface, kind));
        Ok((surface, kind))
    }

    fn unlisten(&mut self, (surface, kind): Self::Listener) {
        let before = self.listeners.len();
        self.listeners.retain(|(s, k, _)| !(*s == surface && *k == kind));
        assert_eq!(before - 1, self.listeners.len(), "listener removed twice");
        self.calls.push(Call::Unlisten(surface, kind));
    }

    fn start_frames(
        &mut self,
        surface: &usize,
        animation: SharedAnimation,
        token: CancelToken,
    ) -> Result<FakeFrames, SiteError> {
        self.frames.push((*surface, animation.clone(), token.clone()));
        self.calls.push(Call::StartFrames(*surface));
        Ok(FakeFrames {
            surface: *surface,
            animation,
            token,
        })
    }

    fn stop_frames(&mut self, frames: FakeFrames) {
        assert!(frames.token.is_cancelled(), "frames stopped before cancel");
        drop(frames.animation);
        self.calls.push(Call::StopFrames(frames.surface));
    }
}

struct NoScroll;

impl ScrollPort for NoScroll {
    fn scroll_to_origin(&self) {}
}

fn selector() -> BackgroundSelector<FakeHost> {
    BackgroundSelector::new(SiteConfig::default())
}

#[test]
fn home_mounts_particles_with_three_listeners() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    assert_eq!(bg.show(PageId::Home, &mut host), Backdrop::Engine(EffectConfig::ParticleField));
    assert_eq!(host.listener_count(), 3);
    assert_eq!(host.attached, vec![0]);
    assert_eq!(bg.mounted().unwrap().listener_count(), 3);
}

#[test]
fn same_page_twice_keeps_the_engine() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    bg.show(PageId::Services, &mut host);
    let calls = host.calls.len();
    assert_eq!(bg.show(PageId::Services, &mut host), Backdrop::Unchanged);
    assert_eq!(host.calls.len(), calls);
}

#[test]
fn repeated_navigation_never_leaks_listeners() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    let mut router = Router::new();
    let baseline = host.listener_count();

    for _ in 0..5 {
        for page in PageId::ALL {
            router.navigate(page, &NoScroll);
            bg.show(router.current_page(), &mut host);
            let expected = match effect_for(page) {
                EffectConfig::ParticleField => 3,
                EffectConfig::Shader(_) => 2,
            };
            assert_eq!(host.listener_count(), expected, "{page}");
            assert_eq!(host.attached.len(), 1, "exactly one surface for {page}");
        }
    }

    bg.clear(&mut host);
    assert_eq!(host.listener_count(), baseline);
    assert!(host.attached.is_empty());
    assert!(bg.mounted().is_none());
}

#[test]
fn previous_engine_is_torn_down_before_next_mounts() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    bg.show(PageId::Home, &mut host);
    host.calls.clear();

    bg.show(PageId::Contact, &mut host);
    let calls = &host.calls;
    let stop = calls.iter().position(|c| *c == Call::StopFrames(0)).unwrap();
    let last_unlisten = calls
        .iter()
        .rposition(|c| matches!(c, Call::Unlisten(0, _)))
        .unwrap();
    let retire = calls.iter().position(|c| *c == Call::Retire(0, 1000)).unwrap();
    let attach = calls
        .iter()
        .position(|c| *c == Call::Attach(1, EffectConfig::Shader(ShaderKind::Ink), true))
        .unwrap();
    assert!(stop < last_unlisten);
    assert!(last_unlisten < retire, "surface detached while listeners live");
    assert!(retire < attach, "new engine mounted before old one left");
}

#[test]
fn no_frames_after_unmount() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    bg.show(PageId::Pricing, &mut host);
    assert_eq!(host.tick(), 1);
    assert_eq!(host.tick(), 1);

    bg.show(PageId::Home, &mut host);
    // Old loop is cancelled; only the new one draws.
    assert_eq!(host.tick(), 1);
    bg.clear(&mut host);
    assert_eq!(host.tick(), 0);
}

#[test]
fn input_reaches_only_the_mounted_engine() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    bg.show(PageId::Services, &mut host);
    let old = bg.mounted().unwrap().animation().clone();
    bg.show(PageId::Contact, &mut host);

    host.dispatch(InputKind::PointerMove, InputEvent::PointerMove { x: 320.0, y: 0.0 });
    let pointer = |anim: &SharedAnimation| match &anim.borrow().state {
        AnimationState::Shader(shader) => shader.pointer,
        AnimationState::Particles(_) => panic!("expected a shader engine"),
    };
    assert_eq!(pointer(&old), Vec2::splat(0.5));
    assert_eq!(pointer(bg.mounted().unwrap().animation()), Vec2::new(0.25, 1.0));
}

#[test]
fn unavailable_runtime_paints_static_colour() {
    let mut host = FakeHost::new();
    host.capability = Capability::Unavailable;
    let mut bg = selector();
    let shown = bg.show(PageId::Contact, &mut host);
    let css = static_colour(EffectConfig::Shader(ShaderKind::Ink));
    assert_eq!(
        shown,
        Backdrop::Static {
            effect: EffectConfig::Shader(ShaderKind::Ink),
            css: css.clone()
        }
    );
    assert_eq!(host.calls, vec![Call::Static(css)]);
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn failed_listen_rolls_back_and_degrades() {
    let mut host = FakeHost::new();
    host.fail_on = Some(InputKind::Scroll);
    let mut bg = selector();
    let shown = bg.show(PageId::Home, &mut host);
    assert!(matches!(shown, Backdrop::Static { .. }));
    assert_eq!(host.listener_count(), 0);
    assert!(host.attached.is_empty());
    assert!(host.calls.contains(&Call::Retire(0, 0)));
    assert!(bg.mounted().is_none());

    // Pages whose engine needs no scroll listener still mount.
    assert_eq!(
        bg.show(PageId::Services, &mut host),
        Backdrop::Engine(EffectConfig::Shader(ShaderKind::Metaballs))
    );
    assert_eq!(host.listener_count(), 2);
}

#[test]
fn scroll_drives_home_camera() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    bg.show(PageId::Home, &mut host);
    host.dispatch(
        InputKind::Scroll,
        InputEvent::Scroll {
            scroll_y: 1000.0,
            scroll_height: 2720.0,
            inner_height: 720.0,
        },
    );
    host.tick();
    let anim = bg.mounted().unwrap().animation().borrow();
    let AnimationState::Particles(motion) = &anim.state else {
        panic!("home should run the particle field");
    };
    assert_eq!(motion.target_z, -400.0);
    assert!((motion.camera_z - (200.0 - 600.0 * 0.05)).abs() < 1e-3);
}

#[test]
fn shared_animation_handle_is_released_on_unmount() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    bg.show(PageId::Dashboard, &mut host);
    let weak = Rc::downgrade(bg.mounted().unwrap().animation());
    bg.clear(&mut host);
    // The fake keeps its frame record; everything else let go.
    host.frames.clear();
    assert!(weak.upgrade().is_none());
}

#[test]
fn shader_surfaces_fade_in_and_home_does_not() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    for page in [PageId::Home, PageId::Services, PageId::Pricing, PageId::Home, PageId::Contact] {
        bg.show(page, &mut host);
    }
    let fades: Vec<(EffectConfig, bool)> = host
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Attach(_, effect, fade_in) => Some((*effect, *fade_in)),
            _ => None,
        })
        .collect();
    assert_eq!(
        fades,
        vec![
            (EffectConfig::ParticleField, false),
            (EffectConfig::Shader(ShaderKind::Metaballs), true),
            (EffectConfig::Shader(ShaderKind::Grid), true),
            (EffectConfig::ParticleField, false),
            (EffectConfig::Shader(ShaderKind::Ink), true),
        ]
    );
}

#[test]
fn unknown_key_renders_home_without_background() {
    let mut host = FakeHost::new();
    let mut bg = selector();
    let mut router = Router::new();

    router.navigate(PageId::Services, &NoScroll);
    bg.show_for(router.backdrop_page(), &mut host);
    assert_eq!(host.listener_count(), 2);

    assert_eq!(router.navigate_key("blog", &NoScroll), PageId::Home);
    assert_eq!(bg.show_for(router.backdrop_page(), &mut host), Backdrop::Empty);
    assert_eq!(router.current_page(), PageId::Home);
    assert_eq!(host.listener_count(), 0);
    assert!(host.attached.is_empty());
    assert!(bg.mounted().is_none());
    assert_eq!(host.tick(), 0);

    // A real home navigation brings the particle field back.
    router.navigate_key("home", &NoScroll);
    assert_eq!(
        bg.show_for(router.backdrop_page(), &mut host),
        Backdrop::Engine(EffectConfig::ParticleField)
    );
    assert_eq!(host.listener_count(), 3);
}

#[test]
fn unknown_key_also_removes_a_static_fallback() {
    let mut host = FakeHost::new();
    host.capability = Capability::Unavailable;
    let mut bg = selector();
    bg.show_for(Some(PageId::Contact), &mut host);
    bg.show_for(None, &mut host);
    assert!(matches!(host.calls.as_slice(), [Call::Static(_), Call::ClearStatic]));
}
