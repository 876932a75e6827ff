//! Recoil accumulation, recovery and the accuracy model.
//!
//! A kick is split in two: the camera takes all of it immediately (visual
//! recoil) while only a fraction lands in [`WeaponState::current_recoil`]
//! (aim recoil). Recovery decays the aim accumulator exponentially and hands
//! back the removed amount so the caller can rotate the camera back in step.

use glam::{Vec2, Vec3};
use rand::Rng;

use engine_core::ViewHandle;

use crate::catalog::WeaponStats;
use crate::config::WeaponTuning;

/// Aim/recoil state. Persists across weapon swaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponState {
    /// Accumulated aim recoil (x = horizontal, y = vertical), radians.
    pub current_recoil: Vec2,
    pub is_aiming: bool,
    /// Derived accuracy, never below the tuning floor.
    pub current_accuracy: f32,
}

impl Default for WeaponState {
    fn default() -> Self {
        Self {
            current_recoil: Vec2::ZERO,
            is_aiming: false,
            current_accuracy: 1.0,
        }
    }
}

impl WeaponState {
    /// Reset for a newly equipped weapon. Aiming carries over.
    pub fn reset_for(&mut self, stats: &WeaponStats) {
        self.current_recoil = Vec2::ZERO;
        self.current_accuracy = stats.accuracy;
    }

    /// Recompute `current_accuracy` from the weapon and stance.
    pub fn refresh_accuracy(&mut self, stats: &WeaponStats, is_moving: bool, tuning: &WeaponTuning) {
        self.current_accuracy = compose_accuracy(stats, self.is_aiming, is_moving, tuning);
    }

    /// Add the aim share of a kick to the accumulator.
    pub fn accumulate(&mut self, kick: Vec2, tuning: &WeaponTuning) {
        self.current_recoil += kick * tuning.aim_recoil_fraction;
    }

    /// Decay the accumulator for one frame and return the amount removed.
    ///
    /// Snaps to exactly zero once below `recoil_epsilon`; the snapped
    /// remainder is part of the returned delta so the camera fully settles.
    pub fn recover(&mut self, recovery_speed: f32, dt: f32, tuning: &WeaponTuning) -> Vec2 {
        let previous = self.current_recoil;
        if previous == Vec2::ZERO {
            return Vec2::ZERO;
        }
        let factor = (recovery_speed * dt).clamp(0.0, 1.0);
        self.current_recoil *= 1.0 - factor;
        if self.current_recoil.length() < tuning.recoil_epsilon {
            self.current_recoil = Vec2::ZERO;
        }
        previous - self.current_recoil
    }
}

/// `max(floor, base + aim bonus - movement penalty)`. An aimed, steady high-accuracy
/// weapon may exceed 1.
pub fn compose_accuracy(stats: &WeaponStats, is_aiming: bool, is_moving: bool, tuning: &WeaponTuning) -> f32 {
    let bonus = if is_aiming { tuning.aim_accuracy_bonus } else { 0.0 };
    let penalty = if is_moving { stats.movement_accuracy_penalty } else { 0.0 };
    (stats.accuracy + bonus - penalty).max(tuning.min_accuracy)
}

/// Rotate the view by a 2D kick: pitch about local X by `y`, then yaw about local Y by `x`.
pub fn apply_kick(view: &mut impl ViewHandle, kick: Vec2) {
    view.rotate_local(Vec3::X, kick.y);
    view.rotate_local(Vec3::Y, kick.x);
}

/// Short-lived cosmetic camera nudge used for reload feedback. Never touches aim.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraJerk {
    offset: Option<Vec2>,
}

impl CameraJerk {
    /// Reload started.
    pub const RELOAD_START: Vec2 = Vec2::new(0.02, 0.01);
    /// Reload finished.
    pub const RELOAD_FINISH: Vec2 = Vec2::new(0.015, 0.02);

    /// Start a new jerk scaled from `magnitude`: random horizontal sign, always downward,
    /// applied to the view immediately. Replaces any jerk in progress.
    pub fn trigger(&mut self, view: &mut impl ViewHandle, magnitude: Vec2, rng: &mut impl Rng) {
        let offset = Vec2::new(
            (rng.gen::<f32>() - 0.5) * 2.0 * magnitude.x * 0.8,
            -magnitude.y.abs() * 0.8,
        );
        apply_kick(view, offset);
        self.offset = Some(offset);
    }

    /// Decay the jerk and rotate the view back by the recovered share.
    pub fn update(&mut self, view: &mut impl ViewHandle, dt: f32, tuning: &WeaponTuning) {
        let Some(offset) = self.offset.as_mut() else {
            return;
        };
        let recovery = (tuning.jerk_decay * dt).clamp(0.0, 1.0);
        let step = *offset * recovery;
        apply_kick(view, -step);
        *offset -= step;

        if offset.length() <= tuning.jerk_epsilon {
            self.offset = None;
        }
    }

    pub fn offset(&self) -> Option<Vec2> {
        self.offset
    }

    pub fn is_active(&self) -> bool {
        self.offset.is_some()
    }

    pub fn clear(&mut self) {
        self.offset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{WeaponCatalog, WeaponType};
    use engine_core::Transform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stats(t: WeaponType) -> std::sync::Arc<WeaponStats> {
        WeaponCatalog::standard().stats_of(t).expect("standard entry")
    }

    #[test]
    fn accuracy_composes_aim_bonus_and_move_penalty() {
        let tuning = WeaponTuning::default();
        let rifle = stats(WeaponType::Rifle);
        assert!((compose_accuracy(&rifle, false, false, &tuning) - 0.8).abs() < 1e-6);
        assert!((compose_accuracy(&rifle, true, false, &tuning) - 0.95).abs() < 1e-6);
        assert!((compose_accuracy(&rifle, false, true, &tuning) - 0.6).abs() < 1e-6);
        assert!((compose_accuracy(&rifle, true, true, &tuning) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn accuracy_never_drops_below_floor() {
        let tuning = WeaponTuning::default();
        let mut worst = (*stats(WeaponType::Sniper)).clone();
        worst.accuracy = 0.0;
        worst.movement_accuracy_penalty = 1.0;
        let mut best = worst.clone();
        best.accuracy = 1.0;
        best.movement_accuracy_penalty = 0.0;

        for s in [&worst, &best] {
            for aiming in [false, true] {
                for moving in [false, true] {
                    let a = compose_accuracy(s, aiming, moving, &tuning);
                    assert!(a >= 0.1, "accuracy {a} below floor");
                }
            }
        }
        assert!((compose_accuracy(&worst, false, true, &tuning) - 0.1).abs() < 1e-6);
        // No upper clamp: an aimed sniper sits above 1.
        let sniper = stats(WeaponType::Sniper);
        assert!((compose_accuracy(&sniper, true, false, &tuning) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn accumulate_takes_aim_fraction() {
        let tuning = WeaponTuning::default();
        let mut state = WeaponState::default();
        state.accumulate(Vec2::new(0.02, 0.03), &tuning);
        assert!((state.current_recoil - Vec2::new(0.008, 0.012)).length() < 1e-7);
    }

    #[test]
    fn recovery_decays_monotonically_to_exact_zero() {
        let tuning = WeaponTuning::default();
        let mut state = WeaponState {
            current_recoil: Vec2::new(0.02, 0.05),
            ..Default::default()
        };
        let speed = 0.9;
        let dt = 1.0 / 60.0;
        let mut total = Vec2::ZERO;
        let mut previous = state.current_recoil.length();
        let mut ticks = 0;
        while state.current_recoil != Vec2::ZERO {
            total += state.recover(speed, dt, &tuning);
            let now = state.current_recoil.length();
            assert!(now < previous);
            previous = now;
            ticks += 1;
            assert!(ticks < 2_000, "recoil did not settle");
        }
        // Bounded by roughly ln(initial / epsilon) / (speed * dt) ticks.
        assert!(ticks < (7.0 / (speed * dt)) as i32);
        // Everything removed was handed back for the camera.
        assert!((total - Vec2::new(0.02, 0.05)).length() < 1e-6);
    }

    #[test]
    fn recovery_factor_is_capped_at_one() {
        let tuning = WeaponTuning::default();
        let mut state = WeaponState {
            current_recoil: Vec2::new(0.01, 0.01),
            ..Default::default()
        };
        let removed = state.recover(1.0, 5.0, &tuning);
        assert_eq!(state.current_recoil, Vec2::ZERO);
        assert!((removed - Vec2::new(0.01, 0.01)).length() < 1e-7);
    }

    #[test]
    fn kick_then_inverse_returns_camera_close_to_start() {
        let mut view = Transform::default();
        apply_kick(&mut view, Vec2::new(0.01, 0.02));
        assert!(view.forward().y > 0.0);
        view.rotate_local(Vec3::Y, -0.01);
        view.rotate_local(Vec3::X, -0.02);
        assert!((view.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn jerk_kicks_down_then_clears() {
        let tuning = WeaponTuning::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut view = Transform::default();
        let mut jerk = CameraJerk::default();

        jerk.trigger(&mut view, CameraJerk::RELOAD_START, &mut rng);
        let offset = jerk.offset().expect("jerk active");
        assert!((offset.y + 0.008).abs() < 1e-7);
        assert!(offset.x.abs() <= 0.016);
        assert!(view.forward().y < 0.0);

        for _ in 0..120 {
            jerk.update(&mut view, 1.0 / 60.0, &tuning);
        }
        assert!(!jerk.is_active());
    }
}
