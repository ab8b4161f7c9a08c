use crate::page::PageId;

/// The three generative shader programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Metaballs,
    Grid,
    Ink,
}

impl ShaderKind {
    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::Metaballs => "metaballs",
            ShaderKind::Grid => "grid",
            ShaderKind::Ink => "ink",
        }
    }
}

/// Which background animation runs behind a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectConfig {
    ParticleField,
    Shader(ShaderKind),
}

impl EffectConfig {
    pub fn name(self) -> &'static str {
        match self {
            EffectConfig::ParticleField => "particles",
            EffectConfig::Shader(kind) => kind.name(),
        }
    }

    /// The home starfield appears without fading in; shader backgrounds
    /// fade in over the cross-fade duration.
    pub fn fades_in(self) -> bool {
        !matches!(self, EffectConfig::ParticleField)
    }
}

/// Fixed page → effect mapping.
pub fn effect_for(page: PageId) -> EffectConfig {
    match page {
        PageId::Home => EffectConfig::ParticleField,
        PageId::Services | PageId::Login => EffectConfig::Shader(ShaderKind::Metaballs),
        PageId::Pricing | PageId::Dashboard => EffectConfig::Shader(ShaderKind::Grid),
        PageId::Contact => EffectConfig::Shader(ShaderKind::Ink),
    }
}
