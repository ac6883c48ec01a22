use bevy::color::{ColorToPacked, Srgba};
use bevy::math::{EulerRot, Quat, Vec3};
use bevy::transform::components::Transform;
use rand::Rng;
use std::f32::consts::TAU;

use crate::GalaxyError;

/// Everything needed to build one galaxy.
///
/// Override single fields with struct update syntax:
/// `GalaxyParams { spin: 2.0, ..Default::default() }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParams {
    pub count: usize,
    /// Point sprite size, only used for rendering.
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    /// Radians of twist per unit of radius.
    pub spin: f32,
    pub randomness: f32,
    /// Higher values pull jitter towards zero.
    pub randomness_power: f32,
    pub inside_color: Srgba,
    pub outside_color: Srgba,
    pub position: Vec3,
    pub rotation: f32,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Srgba::rgb_u8(0xff, 0x60, 0x30),
            outside_color: Srgba::rgb_u8(0x1b, 0x39, 0x84),
            position: Vec3::ZERO,
            rotation: 0.0,
        }
    }
}

impl GalaxyParams {
    // Bounds for the tuning sliders. Colors are unbounded.
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 2,
        spin: -1.0,
        randomness: 0.0,
        randomness_power: 1.0,
        inside_color: Srgba::BLACK,
        outside_color: Srgba::BLACK,
        position: Vec3::splat(-5.0),
        rotation: -5.0,
    };
    pub const MAX: Self = Self {
        count: 500_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 3.0,
        randomness: 2.0,
        randomness_power: 5.0,
        inside_color: Srgba::WHITE,
        outside_color: Srgba::WHITE,
        position: Vec3::splat(5.0),
        rotation: 5.0,
    };
    pub const STEP: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: 0.1,
        randomness: 0.01,
        randomness_power: 0.1,
        inside_color: Srgba::NONE,
        outside_color: Srgba::NONE,
        position: Vec3::splat(0.1),
        rotation: 0.01,
    };

    /// Replaces both colors with CSS style hex strings such as `"#ff6030"`.
    pub fn with_hex_colors(self, inside: &str, outside: &str) -> Result<Self, GalaxyError> {
        let parse = |hex: &str| {
            Srgba::hex(hex).map_err(|e| GalaxyError::InvalidColor(format!("{} ({})", hex, e)))
        };
        Ok(Self {
            inside_color: parse(inside)?,
            outside_color: parse(outside)?,
            ..self
        })
    }

    pub fn validate(&self) -> Result<(), GalaxyError> {
        if self.branches == 0 {
            return Err(GalaxyError::NoBranches);
        }
        if !(self.randomness_power.is_finite() && self.randomness_power > 0.0) {
            return Err(GalaxyError::InvalidRandomnessPower(self.randomness_power));
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(GalaxyError::InvalidRadius(self.radius));
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return Err(GalaxyError::InvalidRandomness(self.randomness));
        }
        if !self.spin.is_finite() {
            return Err(GalaxyError::NonFiniteSpin(self.spin));
        }
        Ok(())
    }

    /// Largest distance a single jitter vector can reach.
    pub fn max_jitter(&self) -> f32 {
        self.randomness * 3f32.sqrt()
    }

    /// Placement of the whole galaxy. The tilt is applied on both X and Z.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(Quat::from_euler(
            EulerRot::XYZ,
            self.rotation,
            0.0,
            self.rotation,
        ))
    }

    /// A scattered galaxy for populating a scene, everything else at default.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut signed = |scale: f32| {
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            rng.random::<f32>() * sign * scale
        };
        let position = Vec3::new(signed(5.0), signed(5.0), signed(5.0));
        let rotation = signed(TAU);
        let spin = signed(2.0);

        Self {
            position,
            rotation,
            spin,
            size: rng.random_range(0.01..0.05),
            branches: rng.random_range(2..6),
            radius: rng.random_range(1.0..8.0),
            randomness_power: rng.random_range(1.5..3.0),
            ..Default::default()
        }
    }

    pub fn inside_rgb(&self) -> [u8; 3] {
        self.inside_color.to_u8_array_no_alpha()
    }

    pub fn outside_rgb(&self) -> [u8; 3] {
        self.outside_color.to_u8_array_no_alpha()
    }
}
