//! The equipped weapon instance: ammo, cadence and reload bookkeeping.

use std::sync::Arc;

use crate::catalog::{WeaponStats, WeaponType};

/// Reserve ammo issued on equip, in magazines.
pub const RESERVE_MAGAZINES: u32 = 3;
/// Slack on the cadence gate, seconds. A shot timed at exactly `last + 1 / fire_rate`
/// must pass even when the f64 subtraction lands a hair short.
const CADENCE_TOLERANCE: f64 = 1e-9;

/// Weapon instance with current state.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub weapon_type: WeaponType,
    pub display_name: String,
    pub stats: Arc<WeaponStats>,

    // State
    pub current_ammo: u32,
    /// Reserve ammo outside the magazine.
    pub total_ammo: u32,
    pub is_reloading: bool,
    /// Clock time of the last successful shot, `None` before the first.
    pub last_shot_time: Option<f64>,
}

impl Weapon {
    /// Fresh weapon with a full magazine and three magazines in reserve.
    pub fn new(weapon_type: WeaponType, display_name: impl Into<String>, stats: Arc<WeaponStats>) -> Self {
        let magazine = stats.magazine_size;
        Self {
            weapon_type,
            display_name: display_name.into(),
            stats,
            current_ammo: magazine,
            total_ammo: magazine * RESERVE_MAGAZINES,
            is_reloading: false,
            last_shot_time: None,
        }
    }

    /// Check if the weapon can fire at clock time `now`.
    pub fn can_fire(&self, now: f64) -> bool {
        if self.is_reloading || self.current_ammo == 0 {
            return false;
        }
        match self.last_shot_time {
            Some(last) => now - last + CADENCE_TOLERANCE >= self.stats.shot_interval(),
            None => true,
        }
    }

    /// Consume one round. Returns the number of rounds already fired from a
    /// full magazine before this shot, which indexes the recoil pattern.
    pub fn fire(&mut self, now: f64) -> Option<u32> {
        if !self.can_fire(now) {
            return None;
        }
        let shots_fired = self.stats.magazine_size.saturating_sub(self.current_ammo);
        self.current_ammo -= 1;
        self.last_shot_time = Some(now);
        Some(shots_fired)
    }

    pub fn is_magazine_full(&self) -> bool {
        self.current_ammo >= self.stats.magazine_size
    }

    /// Reloading needs an empty slot in the magazine and rounds in reserve.
    pub fn can_reload(&self) -> bool {
        !self.is_reloading && !self.is_magazine_full() && self.total_ammo > 0
    }

    /// Move rounds from reserve into the magazine and clear the reload flag.
    /// Returns how many rounds were moved.
    pub fn finish_reload(&mut self) -> u32 {
        let needed = self.stats.magazine_size.saturating_sub(self.current_ammo);
        let moved = needed.min(self.total_ammo);

        self.current_ammo += moved;
        self.total_ammo -= moved;
        self.is_reloading = false;
        moved
    }

    /// Get ammo display string.
    pub fn ammo_display(&self) -> String {
        if self.is_reloading {
            format!("RELOADING... {}", self.total_ammo)
        } else {
            format!("{} / {}", self.current_ammo, self.total_ammo)
        }
    }
}
