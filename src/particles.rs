//! Home page starfield: point cloud generation and the eased camera/rotation
//! state that follows the pointer and the scroll position.

use glam::{Vec2, Vec3};

use crate::config::ParticleConfig;

/// Accent colours, picked by a three-way split of a uniform draw.
pub const PALETTE: [u32; 3] = [0x00BF_FF, 0x8A2B_E2, 0x00FF_FF];

/// Scene clear and fog colour.
pub const BACKDROP: u32 = 0x0A0A_0A;

pub fn hex_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

fn pick_colour(draw: f32) -> u32 {
    if draw < 0.33 {
        PALETTE[0]
    } else if draw < 0.66 {
        PALETTE[1]
    } else {
        PALETTE[2]
    }
}

/// Exponential smoothing step.
#[inline]
pub fn ease(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Interleaved xyz positions and rgb colours, ready for upload.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl ParticleCloud {
    pub fn generate(cfg: &ParticleConfig, rng: &mut fastrand::Rng) -> Self {
        let extent = half_extents(cfg) * 2.0;
        let mut positions = Vec::with_capacity(cfg.count * 3);
        let mut colors = Vec::with_capacity(cfg.count * 3);
        for _ in 0..cfg.count {
            positions.push((rng.f32() - 0.5) * extent.x);
            positions.push((rng.f32() - 0.5) * extent.y);
            positions.push((rng.f32() - 0.5) * extent.z);
            colors.extend_from_slice(&hex_rgb(pick_colour(rng.f32())));
        }
        Self { positions, colors }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Half size of the box the points are scattered in, centred on the origin.
pub fn half_extents(cfg: &ParticleConfig) -> Vec3 {
    Vec3::new(
        cfg.box_size * 0.5,
        cfg.box_size * 0.5,
        cfg.box_size * cfg.depth_factor * 0.5,
    )
}

/// Camera depth and cloud rotation, both eased toward input-driven targets.
#[derive(Debug, Clone)]
pub struct ParticleMotion {
    pub camera_z: f32,
    pub target_z: f32,
    pub rotation: Vec2,
    /// Normalized pointer in [-1, 1], y up.
    pub pointer: Vec2,
    smoothing: f32,
    base_depth: f32,
    depth_range: f32,
}

impl ParticleMotion {
    pub fn new(cfg: &ParticleConfig) -> Self {
        Self {
            camera_z: cfg.base_depth,
            target_z: cfg.base_depth,
            rotation: Vec2::ZERO,
            pointer: Vec2::ZERO,
            smoothing: cfg.smoothing,
            base_depth: cfg.base_depth,
            depth_range: cfg.depth_range,
        }
    }

    pub fn on_pointer(&mut self, client_x: f32, client_y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.pointer = Vec2::new(
            client_x / width * 2.0 - 1.0,
            -(client_y / height) * 2.0 + 1.0,
        );
    }

    /// Pull the camera through the cloud as the document scrolls. Documents
    /// without overflow leave the target alone.
    pub fn on_scroll(&mut self, scroll_y: f32, scroll_height: f32, inner_height: f32) {
        let scrollable = scroll_height - inner_height;
        if scrollable <= 0.0 {
            return;
        }
        let fraction = scroll_y / scrollable;
        let fraction = if fraction.is_nan() { 0.0 } else { fraction };
        self.target_z = self.base_depth - fraction * self.depth_range;
    }

    /// Rotation the cloud is easing toward for the current pointer.
    pub fn target_rotation(&self) -> Vec2 {
        Vec2::new(-self.pointer.y * 0.1, -self.pointer.x * 0.1)
    }

    pub fn step(&mut self) {
        self.camera_z = ease(self.camera_z, self.target_z, self.smoothing);
        let target = self.target_rotation();
        self.rotation.x = ease(self.rotation.x, target.x, self.smoothing);
        self.rotation.y = ease(self.rotation.y, target.y, self.smoothing);
    }
}
