use crate::config::SiteConfig;
use crate::effects::{effect_for, EffectConfig};
use crate::engine::{Capability, EngineHost, MountedEngine};
use crate::page::PageId;
use crate::particles::{hex_rgb, BACKDROP};
use crate::shader::{css_rgb, resting_colour};

/// What `BackgroundSelector::show` did.
#[derive(Debug, Clone, PartialEq)]
pub enum Backdrop {
    /// The page already had its background.
    Unchanged,
    Engine(EffectConfig),
    /// No 3D runtime, or the engine failed to start.
    Static { effect: EffectConfig, css: String },
    /// The page has no background at all.
    Empty,
}

/// Flat colour standing in for an effect when it cannot be animated.
pub fn static_colour(effect: EffectConfig) -> String {
    match effect {
        EffectConfig::ParticleField => css_rgb(hex_rgb(BACKDROP).into()),
        EffectConfig::Shader(kind) => css_rgb(resting_colour(kind, 12)),
    }
}

/// Keeps exactly one engine mounted, matching the router's current page.
pub struct BackgroundSelector<H: EngineHost> {
    config: SiteConfig,
    page: Option<PageId>,
    mounted: Option<MountedEngine<H>>,
}

impl<H: EngineHost> BackgroundSelector<H> {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            page: None,
            mounted: None,
        }
    }

    pub fn page(&self) -> Option<PageId> {
        self.page
    }

    pub fn mounted(&self) -> Option<&MountedEngine<H>> {
        self.mounted.as_ref()
    }

    pub fn show(&mut self, page: PageId, host: &mut H) -> Backdrop {
        if self.page == Some(page) {
            return Backdrop::Unchanged;
        }
        self.clear(host);
        self.page = Some(page);

        let effect = effect_for(page);
        if host.capability() == Capability::Unavailable {
            log::info!("3D runtime unavailable, static background for {page}");
            return self.fallback(effect, host);
        }

        match MountedEngine::mount(host, effect, &self.config) {
            Ok(engine) => {
                log::info!("background for {page}: {}", effect.name());
                self.mounted = Some(engine);
                Backdrop::Engine(effect)
            }
            Err(err) => {
                log::warn!("could not start {} background: {err}", effect.name());
                self.fallback(effect, host)
            }
        }
    }

    /// Like `show`, but `None` removes every background, static or animated.
    pub fn show_for(&mut self, page: Option<PageId>, host: &mut H) -> Backdrop {
        match page {
            Some(page) => self.show(page, host),
            None => {
                self.clear(host);
                host.clear_static();
                Backdrop::Empty
            }
        }
    }

    /// Unmount the current engine, if any. Its surface fades out afterwards.
    pub fn clear(&mut self, host: &mut H) {
        if let Some(engine) = self.mounted.take() {
            engine.unmount(host, self.config.fade_ms);
        }
        self.page = None;
    }

    fn fallback(&mut self, effect: EffectConfig, host: &mut H) -> Backdrop {
        let css = static_colour(effect);
        host.paint_static(&css);
        Backdrop::Static { effect, css }
    }
}
