use serde::Deserialize;

pub const DEFAULT_CONTACT_ENDPOINT: &str =
    "https://doc2ai.ch/webhook-test/53394872-b923-41a0-a7ac-6ba7d1e385a7";

/// Site-wide knobs. Every field has a default so a partial JSON block (or
/// none at all) is enough.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub contact_endpoint: String,
    /// Cross-fade duration between backgrounds.
    pub fade_ms: u32,
    pub log_level: String,
    pub particles: ParticleConfig,
    pub shader: ShaderConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            fade_ms: 1000,
            log_level: "info".to_string(),
            particles: ParticleConfig::default(),
            shader: ShaderConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Width and height of the bounding box.
    pub box_size: f32,
    /// Depth of the box as a multiple of `box_size`.
    pub depth_factor: f32,
    pub base_depth: f32,
    pub depth_range: f32,
    pub smoothing: f32,
    pub point_size: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 15_000,
            box_size: 800.0,
            depth_factor: 2.5,
            base_depth: 200.0,
            depth_range: 1200.0,
            smoothing: 0.05,
            point_size: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub time_step: f32,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self { time_step: 0.01 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let cfg = SiteConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SiteConfig::default());
        assert_eq!(cfg.particles.count, 15_000);
        assert_eq!(cfg.fade_ms, 1000);
    }

    #[test]
    fn partial_override() {
        let cfg = SiteConfig::from_json(
            r#"{"fade_ms": 250, "particles": {"count": 10}, "log_level": "debug"}"#,
        )
        .unwrap();
        assert_eq!(cfg.fade_ms, 250);
        assert_eq!(cfg.particles.count, 10);
        assert_eq!(cfg.particles.box_size, 800.0);
        assert_eq!(cfg.log_level(), log::Level::Debug);
    }

    #[test]
    fn bad_level_defaults_to_info() {
        let cfg = SiteConfig {
            log_level: "loud".into(),
            ..SiteConfig::default()
        };
        assert_eq!(cfg.log_level(), log::Level::Info);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SiteConfig::from_json("{fade_ms:").is_err());
    }
}
