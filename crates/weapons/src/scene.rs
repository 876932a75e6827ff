//! Scene-graph collaborator for the weapon viewmodel.
//!
//! The controller never touches meshes. It tells the scene when to build or
//! drop the weapon model and hands over a [`PresentationFrame`] each tick.

use glam::Vec3;

use crate::catalog::WeaponType;
use crate::effects::{InsertFlash, Particle};
use crate::viewmodel::{MagazinePose, ModelLayout, ViewmodelPose};

/// Everything a renderer needs to draw the viewmodel for one frame.
#[derive(Debug, Clone, Copy)]
pub struct PresentationFrame<'a> {
    pub pose: &'a ViewmodelPose,
    pub magazine: &'a MagazinePose,
    pub muzzle_flash: bool,
    pub insert_flash: Option<&'a InsertFlash>,
    /// Spark pool slots; only `active` ones are live.
    pub particles: &'a [Particle],
}

/// Host-side scene hooks. Only model attach/detach is mandatory.
pub trait ViewmodelScene {
    /// Build and attach the visual model for `weapon_type` under the camera.
    fn attach_weapon_model(&mut self, weapon_type: WeaponType, layout: &ModelLayout);

    /// Detach the weapon model and every effect object parented to it.
    fn detach_weapon_model(&mut self);

    /// A shot left the muzzle at `muzzle` (weapon-local).
    fn muzzle_flash(&mut self, _muzzle: Vec3) {}

    /// Per-frame viewmodel and effect state.
    fn present(&mut self, _frame: &PresentationFrame<'_>) {}
}

/// Scene that draws nothing, for headless simulation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScene;

impl ViewmodelScene for NullScene {
    fn attach_weapon_model(&mut self, weapon_type: WeaponType, _layout: &ModelLayout) {
        log::trace!("headless scene: attach {}", weapon_type);
    }

    fn detach_weapon_model(&mut self) {
        log::trace!("headless scene: detach weapon model");
    }
}
