//! Shot events handed to hit detection.

use glam::{Quat, Vec3};
use rand::Rng;

use crate::weapon::Weapon;

/// One fired round, emitted synchronously from a successful shot.
#[derive(Debug, Clone)]
pub struct ShotInfo {
    /// Eye position when the shot left.
    pub origin: Vec3,
    /// Unit direction including recoil and spread.
    pub direction: Vec3,
    /// Weapon state right after the round was consumed.
    pub weapon: Weapon,
    /// Clock time of the shot, seconds.
    pub timestamp: f64,
}

/// Forward direction under `orientation`, jittered on x and y by up to
/// `±spread / 2` where `spread = (1 - accuracy) * spread_scale`. The jitter is
/// symmetric, so accuracy above 1 still spreads by `accuracy - 1`.
pub fn spread_direction(orientation: Quat, accuracy: f32, spread_scale: f32, rng: &mut impl Rng) -> Vec3 {
    let spread = (1.0 - accuracy) * spread_scale;
    let forward = orientation * Vec3::NEG_Z;
    let mut direction = forward;
    direction.x += (rng.gen::<f32>() - 0.5) * spread;
    direction.y += (rng.gen::<f32>() - 0.5) * spread;
    direction.try_normalize().unwrap_or(forward)
}
