//! The weapon controller: firing gate, ammo and reload state machine, recoil and
//! accuracy, and the tick-driven camera/viewmodel presentation.
//!
//! Every action is a boolean gate. Invalid calls (empty magazine, mid-reload,
//! nothing equipped) return `false` and change nothing, so input code can
//! probe every frame.

use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use engine_core::{Clock, ViewHandle};

use crate::catalog::{WeaponCatalog, WeaponType};
use crate::config::{WeaponConfig, WeaponTuning};
use crate::effects::WeaponEffects;
use crate::recoil::{apply_kick, CameraJerk, WeaponState};
use crate::scene::{NullScene, PresentationFrame, ViewmodelScene};
use crate::shot::{spread_direction, ShotInfo};
use crate::viewmodel::{ViewmodelAnimState, ViewmodelMode};
use crate::weapon::Weapon;

/// A scheduled reload completion. Dropping it cancels the reload.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingReload {
    started_at: f64,
    due_at: f64,
}

/// Owns the equipped weapon and everything that may mutate its ammo, recoil or reload state.
pub struct WeaponController<V: ViewHandle, C: Clock> {
    camera: V,
    clock: C,
    catalog: WeaponCatalog,
    tuning: WeaponTuning,
    scene: Box<dyn ViewmodelScene>,
    on_shoot: Box<dyn FnMut(&ShotInfo)>,
    rng: StdRng,

    weapon: Option<Weapon>,
    state: WeaponState,
    is_moving: bool,
    reload: Option<PendingReload>,

    jerk: CameraJerk,
    viewmodel: Option<ViewmodelAnimState>,
    effects: WeaponEffects,
}

impl<V: ViewHandle, C: Clock> WeaponController<V, C> {
    /// Controller with the standard catalog, default tuning and a headless scene.
    pub fn new(camera: V, clock: C, on_shoot: impl FnMut(&ShotInfo) + 'static) -> Self {
        Self {
            camera,
            clock,
            catalog: WeaponCatalog::standard(),
            tuning: WeaponTuning::default(),
            scene: Box::new(NullScene),
            on_shoot: Box::new(on_shoot),
            rng: StdRng::from_entropy(),
            weapon: None,
            state: WeaponState::default(),
            is_moving: false,
            reload: None,
            jerk: CameraJerk::default(),
            viewmodel: None,
            effects: WeaponEffects::default(),
        }
    }

    /// Controller set up from a loaded [`WeaponConfig`].
    pub fn from_config(
        camera: V,
        clock: C,
        config: &WeaponConfig,
        on_shoot: impl FnMut(&ShotInfo) + 'static,
    ) -> Self {
        let mut controller = Self::new(camera, clock, on_shoot)
            .with_catalog(config.catalog())
            .with_tuning(config.tuning.clone());
        if let Some(seed) = config.seed {
            controller = controller.with_seed(seed);
        }
        controller
    }

    pub fn with_catalog(mut self, catalog: WeaponCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_tuning(mut self, tuning: WeaponTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_scene(mut self, scene: impl ViewmodelScene + 'static) -> Self {
        self.scene = Box::new(scene);
        self
    }

    /// Fixed seed for spread and jerk randomness, for replays and tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Equip a fresh weapon of `weapon_type`. Cancels any pending reload.
    /// A type missing from the catalog is ignored and leaves everything as it was.
    pub fn equip(&mut self, weapon_type: WeaponType, name: impl Into<String>) {
        let Some(stats) = self.catalog.stats_of(weapon_type) else {
            log::warn!("No catalog entry for {}, keeping current weapon", weapon_type);
            return;
        };

        if self.reload.take().is_some() {
            log::debug!("Pending reload cancelled by equip");
        }

        let weapon = Weapon::new(weapon_type, name, stats);
        self.state.reset_for(&weapon.stats);
        self.effects.clear();

        if self.viewmodel.is_some() {
            self.scene.detach_weapon_model();
        }
        let viewmodel = ViewmodelAnimState::new(weapon_type);
        self.scene.attach_weapon_model(weapon_type, &viewmodel.layout);
        self.viewmodel = Some(viewmodel);

        log::info!(
            "Equipped {} ({}): {}",
            weapon.display_name,
            weapon_type,
            weapon.ammo_display()
        );
        self.weapon = Some(weapon);
    }

    /// Fire one round. Emits exactly one [`ShotInfo`] before returning `true`.
    pub fn shoot(&mut self) -> bool {
        self.resolve_due_reload();
        let now = self.clock.now();

        let Some(weapon) = self.weapon.as_mut() else {
            return false;
        };
        let Some(shots_fired) = weapon.fire(now) else {
            return false;
        };
        let stats = Arc::clone(&weapon.stats);

        // Full kick on screen, partial kick on aim.
        let kick = stats.recoil_at(shots_fired);
        apply_kick(&mut self.camera, kick);
        self.state.accumulate(kick, &self.tuning);
        self.state.refresh_accuracy(&stats, self.is_moving, &self.tuning);

        let direction = spread_direction(
            self.camera.orientation(),
            self.state.current_accuracy,
            self.tuning.spread_scale,
            &mut self.rng,
        );
        let shot = ShotInfo {
            origin: self.camera.position(),
            direction,
            weapon: weapon.clone(),
            timestamp: now,
        };
        let needs_reload = weapon.current_ammo == 0 && weapon.total_ammo > 0;

        log::debug!(
            "{} fired: ammo {}, accuracy {:.2}, recoil {:?}",
            shot.weapon.weapon_type,
            shot.weapon.ammo_display(),
            self.state.current_accuracy,
            self.state.current_recoil
        );
        (self.on_shoot)(&shot);

        if needs_reload {
            self.start_reload();
        }

        self.effects.muzzle_flash.trigger(self.tuning.muzzle_flash_duration);
        if let Some(viewmodel) = &self.viewmodel {
            self.scene.muzzle_flash(viewmodel.layout.muzzle_offset);
        }
        true
    }

    /// Begin a reload. Refused with nothing equipped, mid-reload, with a full
    /// magazine, or with no reserve ammo.
    pub fn start_reload(&mut self) -> bool {
        self.resolve_due_reload();
        let now = self.clock.now();

        let Some(weapon) = self.weapon.as_mut() else {
            return false;
        };
        if !weapon.can_reload() {
            return false;
        }

        weapon.is_reloading = true;
        let reload_time = weapon.stats.reload_time;
        self.reload = Some(PendingReload {
            started_at: now,
            due_at: now + reload_time as f64,
        });
        log::info!("Reloading {} ({:.1}s)", weapon.weapon_type, reload_time);

        self.jerk.trigger(&mut self.camera, CameraJerk::RELOAD_START, &mut self.rng);
        true
    }

    /// Toggle aim-down-sights. Accuracy is recomputed only when the flag changes.
    pub fn set_aiming(&mut self, aiming: bool) {
        if self.state.is_aiming == aiming {
            return;
        }
        self.state.is_aiming = aiming;
        if let Some(weapon) = &self.weapon {
            self.state.refresh_accuracy(&weapon.stats, self.is_moving, &self.tuning);
        }
    }

    /// Record whether the player is moving. The penalty takes effect at the
    /// next shot or aim toggle, not immediately.
    pub fn set_moving(&mut self, moving: bool) {
        self.is_moving = moving;
    }

    /// Per-frame update: reload completion, camera jerk, recoil recovery,
    /// viewmodel motion and effect timers.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.resolve_due_reload();

        self.jerk.update(&mut self.camera, dt, &self.tuning);

        if let Some(weapon) = &self.weapon {
            let recovered = self
                .state
                .recover(weapon.stats.recoil_recovery_speed, dt, &self.tuning);
            if recovered != Vec2::ZERO {
                apply_kick(&mut self.camera, -recovered);
            }
        }

        if self.effects.update(dt) {
            log::trace!("Muzzle flash expired");
        }

        let mode = self.viewmodel_mode();
        if let Some(viewmodel) = self.viewmodel.as_mut() {
            if let Some(seat) = viewmodel.update(dt, mode, self.tuning.viewmodel_rate) {
                self.effects.magazine_inserted(seat, &mut self.rng);
            }
            let frame = PresentationFrame {
                pose: &viewmodel.pose,
                magazine: &viewmodel.magazine,
                muzzle_flash: self.effects.muzzle_flash.is_visible(),
                insert_flash: self.effects.insert_flash.as_ref(),
                particles: self.effects.particles.slots(),
            };
            self.scene.present(&frame);
        }
    }

    /// Cancel the pending reload, clear transient effects and detach the
    /// weapon model. Leaves nothing equipped. Safe to call more than once;
    /// also runs on drop.
    pub fn teardown(&mut self) {
        self.reload = None;
        self.jerk.clear();
        self.effects.clear();
        if self.viewmodel.take().is_some() {
            self.scene.detach_weapon_model();
        }
        if let Some(weapon) = self.weapon.take() {
            log::debug!("Weapon controller torn down with {} equipped", weapon.weapon_type);
        }
    }

    pub fn current_weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    pub fn weapon_state(&self) -> &WeaponState {
        &self.state
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Reload progress in 0..=1 while reloading.
    pub fn reload_progress(&self) -> Option<f32> {
        let pending = self.reload?;
        let weapon = self.weapon.as_ref()?;
        let elapsed = (self.clock.now() - pending.started_at) as f32;
        Some((elapsed / weapon.stats.reload_time).clamp(0.0, 1.0))
    }

    pub fn viewmodel(&self) -> Option<&ViewmodelAnimState> {
        self.viewmodel.as_ref()
    }

    pub fn effects(&self) -> &WeaponEffects {
        &self.effects
    }

    /// Current reload camera jerk, if one is still settling.
    pub fn camera_jerk(&self) -> Option<Vec2> {
        self.jerk.offset()
    }

    pub fn camera(&self) -> &V {
        &self.camera
    }

    /// Host access for mouse look and movement.
    pub fn camera_mut(&mut self) -> &mut V {
        &mut self.camera
    }

    pub fn catalog(&self) -> &WeaponCatalog {
        &self.catalog
    }

    fn viewmodel_mode(&self) -> ViewmodelMode {
        match self.reload_progress() {
            Some(progress) => ViewmodelMode::Reloading(progress),
            None if self.state.is_aiming => ViewmodelMode::Aiming,
            None => ViewmodelMode::Hip,
        }
    }

    /// Fire the reload completion if its deadline has passed.
    fn resolve_due_reload(&mut self) {
        let Some(pending) = self.reload else {
            return;
        };
        if self.clock.now() < pending.due_at {
            return;
        }
        self.reload = None;
        self.complete_reload();
    }

    fn complete_reload(&mut self) {
        // The weapon may have been swapped or torn down since the reload began.
        let Some(weapon) = self.weapon.as_mut().filter(|w| w.is_reloading) else {
            log::debug!("Reload completion with no reloading weapon, ignored");
            return;
        };
        let moved = weapon.finish_reload();
        log::info!("Reloaded {}: +{} ({})", weapon.weapon_type, moved, weapon.ammo_display());

        self.jerk.trigger(&mut self.camera, CameraJerk::RELOAD_FINISH, &mut self.rng);
    }
}

impl<V: ViewHandle, C: Clock> Drop for WeaponController<V, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
