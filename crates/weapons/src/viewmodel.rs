//! First-person weapon viewmodel animation: hip/aim poses, reload motion and magazine swap.

use glam::Vec3;

use crate::catalog::WeaponType;

/// Hip-fire pose target in view space.
pub const HIP_POSITION: Vec3 = Vec3::new(0.3, -0.3, -0.8);
/// Aim-down-sights pose target in view space.
pub const AIM_POSITION: Vec3 = Vec3::new(0.0, -0.2, -0.5);
/// How far the magazine drops out of the well during a reload.
const MAGAZINE_DROP: f32 = 0.3;
/// Magazine pitch at full extraction.
const MAGAZINE_TILT: f32 = 0.2;
/// Fraction of the insert phase at which the magazine seats.
const MAGAZINE_SEAT_AT: f32 = 0.85;

/// Static mesh placement for one weapon type, handed to the scene when the model is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelLayout {
    /// Receiver box size.
    pub body_size: Vec3,
    /// Initial position in view space.
    pub position: Vec3,
    pub scale: Vec3,
    /// Magazine box size.
    pub magazine_size: Vec3,
    /// Magazine rest position, local to the weapon.
    pub magazine_origin: Vec3,
    /// Muzzle position, local to the weapon.
    pub muzzle_offset: Vec3,
}

impl ModelLayout {
    pub fn for_weapon(weapon_type: WeaponType) -> Self {
        let muzzle_offset = Vec3::new(0.0, 0.0, -1.05);
        match weapon_type {
            WeaponType::Rifle => Self {
                body_size: Vec3::new(0.1, 0.1, 0.8),
                position: Vec3::new(0.3, -0.3, -0.8),
                scale: Vec3::ONE,
                magazine_size: Vec3::new(0.1, 0.15, 0.1),
                magazine_origin: Vec3::new(0.0, -0.1, 0.1),
                muzzle_offset,
            },
            WeaponType::Smg => Self {
                body_size: Vec3::new(0.1, 0.1, 0.6),
                position: Vec3::new(0.25, -0.25, -0.7),
                scale: Vec3::new(1.2, 1.0, 1.0),
                magazine_size: Vec3::new(0.08, 0.12, 0.08),
                magazine_origin: Vec3::new(0.0, -0.1, 0.05),
                muzzle_offset,
            },
            WeaponType::Pistol => Self {
                body_size: Vec3::new(0.07, 0.15, 0.3),
                position: Vec3::new(0.2, -0.2, -0.5),
                scale: Vec3::ONE,
                magazine_size: Vec3::new(0.06, 0.1, 0.06),
                magazine_origin: Vec3::new(0.0, -0.1, 0.0),
                muzzle_offset,
            },
            WeaponType::Sniper => Self {
                body_size: Vec3::new(0.08, 0.08, 1.2),
                position: Vec3::new(0.3, -0.3, -1.0),
                scale: Vec3::ONE,
                magazine_size: Vec3::new(0.1, 0.16, 0.1),
                magazine_origin: Vec3::new(0.0, -0.1, 0.2),
                muzzle_offset,
            },
        }
    }
}

/// Displayed viewmodel transform. Rotation is XYZ Euler radians, interpolated per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewmodelPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl ViewmodelPose {
    /// Move each axis toward `target` by `rate` of the remaining distance.
    pub fn approach(&mut self, target: &ViewmodelPose, rate: f32) {
        let rate = rate.clamp(0.0, 1.0);
        self.position += (target.position - self.position) * rate;
        self.rotation += (target.rotation - self.rotation) * rate;
    }
}

/// Magazine transform, local to the weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagazinePose {
    pub position: Vec3,
    pub pitch: f32,
    pub visible: bool,
}

impl MagazinePose {
    fn seated(origin: Vec3) -> Self {
        Self { position: origin, pitch: 0.0, visible: true }
    }
}

/// The three legs of a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadPhase {
    /// 0–40%: magazine drops out.
    MagazineOut,
    /// 40–60%: magazine detached, hidden.
    Detached,
    /// 60–100%: new magazine slides in.
    MagazineIn,
}

impl ReloadPhase {
    pub fn at(progress: f32) -> Self {
        if progress < 0.4 {
            ReloadPhase::MagazineOut
        } else if progress < 0.6 {
            ReloadPhase::Detached
        } else {
            ReloadPhase::MagazineIn
        }
    }
}

/// What the viewmodel should be doing this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewmodelMode {
    Hip,
    Aiming,
    /// Reload progress in 0..=1.
    Reloading(f32),
}

/// Target pose for a mode.
pub fn target_pose(weapon_type: WeaponType, mode: ViewmodelMode) -> ViewmodelPose {
    match mode {
        ViewmodelMode::Hip => ViewmodelPose { position: HIP_POSITION, rotation: Vec3::ZERO },
        ViewmodelMode::Aiming => ViewmodelPose { position: AIM_POSITION, rotation: Vec3::ZERO },
        ViewmodelMode::Reloading(progress) => {
            let swing = (progress.clamp(0.0, 1.0) * std::f32::consts::PI).sin();
            match weapon_type {
                WeaponType::Rifle | WeaponType::Smg => {
                    let tilt = swing * 0.5;
                    ViewmodelPose {
                        position: Vec3::new(0.4, -0.1, -0.6),
                        rotation: Vec3::new(tilt * 0.2, 0.0, tilt),
                    }
                }
                WeaponType::Pistol => ViewmodelPose {
                    position: Vec3::new(0.4, -0.4, -0.6),
                    rotation: Vec3::new(0.0, 0.0, swing * 0.25),
                },
                WeaponType::Sniper => ViewmodelPose {
                    position: Vec3::new(0.5, -0.3, -0.7),
                    rotation: Vec3::new(0.0, swing * 0.15, swing * 0.3),
                },
            }
        }
    }
}

/// Magazine pose during a reload at `progress`.
pub fn magazine_pose(origin: Vec3, progress: f32) -> MagazinePose {
    let progress = progress.clamp(0.0, 1.0);
    match ReloadPhase::at(progress) {
        ReloadPhase::MagazineOut => {
            let drop = progress / 0.4;
            MagazinePose {
                position: Vec3::new(origin.x, origin.y - drop * MAGAZINE_DROP, origin.z),
                pitch: drop * MAGAZINE_TILT,
                visible: true,
            }
        }
        ReloadPhase::Detached => MagazinePose {
            position: Vec3::new(origin.x, origin.y - MAGAZINE_DROP, origin.z),
            pitch: MAGAZINE_TILT,
            visible: false,
        },
        ReloadPhase::MagazineIn => {
            let remaining = 1.0 - (progress - 0.6) / 0.4;
            MagazinePose {
                position: Vec3::new(origin.x, origin.y - remaining * MAGAZINE_DROP, origin.z),
                pitch: remaining * MAGAZINE_TILT,
                visible: true,
            }
        }
    }
}

/// Animation state for the equipped weapon's viewmodel.
#[derive(Debug, Clone)]
pub struct ViewmodelAnimState {
    pub weapon_type: WeaponType,
    pub layout: ModelLayout,
    /// Displayed pose (what the renderer draws).
    pub pose: ViewmodelPose,
    pub magazine: MagazinePose,
    /// The magazine-seat effect already fired for the current reload.
    seat_fired: bool,
}

impl ViewmodelAnimState {
    pub fn new(weapon_type: WeaponType) -> Self {
        let layout = ModelLayout::for_weapon(weapon_type);
        Self {
            weapon_type,
            layout,
            pose: ViewmodelPose { position: layout.position, rotation: Vec3::ZERO },
            magazine: MagazinePose::seated(layout.magazine_origin),
            seat_fired: false,
        }
    }

    /// Advance one frame. Returns the magazine position on the frame the new magazine seats.
    pub fn update(&mut self, dt: f32, mode: ViewmodelMode, approach_rate: f32) -> Option<Vec3> {
        let mut seated_at = None;
        match mode {
            ViewmodelMode::Reloading(progress) => {
                self.magazine = magazine_pose(self.layout.magazine_origin, progress);
                let insert = (progress - 0.6) / 0.4;
                if insert >= MAGAZINE_SEAT_AT && !self.seat_fired {
                    self.seat_fired = true;
                    seated_at = Some(self.magazine.position);
                }
            }
            ViewmodelMode::Hip | ViewmodelMode::Aiming => {
                self.magazine = MagazinePose::seated(self.layout.magazine_origin);
                self.seat_fired = false;
            }
        }

        let target = target_pose(self.weapon_type, mode);
        self.pose.approach(&target, approach_rate * dt);
        seated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_phases_split_at_forty_and_sixty_percent() {
        assert_eq!(ReloadPhase::at(0.0), ReloadPhase::MagazineOut);
        assert_eq!(ReloadPhase::at(0.39), ReloadPhase::MagazineOut);
        assert_eq!(ReloadPhase::at(0.4), ReloadPhase::Detached);
        assert_eq!(ReloadPhase::at(0.59), ReloadPhase::Detached);
        assert_eq!(ReloadPhase::at(0.6), ReloadPhase::MagazineIn);
        assert_eq!(ReloadPhase::at(1.0), ReloadPhase::MagazineIn);
    }

    #[test]
    fn magazine_drops_hides_and_returns() {
        let origin = Vec3::new(0.0, -0.1, 0.1);
        let out = magazine_pose(origin, 0.2);
        assert!(out.visible);
        assert!((out.position.y - (-0.1 - 0.15)).abs() < 1e-6);

        assert!(!magazine_pose(origin, 0.5).visible);

        let seated = magazine_pose(origin, 1.0);
        assert!(seated.visible);
        assert!((seated.position - origin).length() < 1e-6);
        assert!(seated.pitch.abs() < 1e-6);
    }

    #[test]
    fn pose_approaches_target_without_snapping() {
        let mut anim = ViewmodelAnimState::new(WeaponType::Pistol);
        let start = anim.pose.position;
        anim.update(1.0 / 60.0, ViewmodelMode::Aiming, 4.0);
        let moved = anim.pose.position;
        assert_ne!(moved, start);
        assert_ne!(moved, AIM_POSITION);
        // One step covers rate*dt of the remaining distance.
        let expected = start + (AIM_POSITION - start) * (4.0 / 60.0);
        assert!((moved - expected).length() < 1e-6);

        for _ in 0..600 {
            anim.update(1.0 / 60.0, ViewmodelMode::Aiming, 4.0);
        }
        assert!((anim.pose.position - AIM_POSITION).length() < 1e-4);
    }

    #[test]
    fn large_step_does_not_overshoot() {
        let mut anim = ViewmodelAnimState::new(WeaponType::Rifle);
        anim.update(2.0, ViewmodelMode::Aiming, 4.0);
        assert!((anim.pose.position - AIM_POSITION).length() < 1e-6);
    }

    #[test]
    fn sniper_reload_swings_in_yaw_and_roll() {
        let pose = target_pose(WeaponType::Sniper, ViewmodelMode::Reloading(0.5));
        assert!((pose.rotation.y - 0.15).abs() < 1e-6);
        assert!((pose.rotation.z - 0.3).abs() < 1e-6);
        let rifle = target_pose(WeaponType::Rifle, ViewmodelMode::Reloading(0.5));
        assert!((rifle.rotation.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn magazine_seat_fires_once_per_reload() {
        let mut anim = ViewmodelAnimState::new(WeaponType::Rifle);
        let mut fired = 0;
        for step in 0..=100 {
            let progress = step as f32 / 100.0;
            if anim.update(0.01, ViewmodelMode::Reloading(progress), 4.0).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);

        anim.update(0.01, ViewmodelMode::Hip, 4.0);
        let again = anim.update(0.01, ViewmodelMode::Reloading(0.99), 4.0);
        assert!(again.is_some());
    }
}
