//! Weapon catalog: the static per-type stats table.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, UnknownWeaponType};

/// Weapon types available to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponType {
    /// Assault rifle - steady auto fire, climbing recoil.
    Rifle,
    /// Submachine gun - fast, forgiving on the move, short range.
    Smg,
    /// Sidearm - light kick, small magazine.
    Pistol,
    /// Bolt sniper - slow, hard-hitting, punished for moving.
    Sniper,
}

impl WeaponType {
    pub const ALL: [WeaponType; 4] = [
        WeaponType::Rifle,
        WeaponType::Smg,
        WeaponType::Pistol,
        WeaponType::Sniper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeaponType::Rifle => "RIFLE",
            WeaponType::Smg => "SMG",
            WeaponType::Pistol => "PISTOL",
            WeaponType::Sniper => "SNIPER",
        }
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeaponType {
    type Err = UnknownWeaponType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeaponType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownWeaponType(s.to_string()))
    }
}

/// Immutable ballistic and handling stats for one weapon type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: u32,
    /// Shots per second.
    pub fire_rate: f32,
    pub magazine_size: u32,
    /// Seconds.
    pub reload_time: f32,
    /// Base accuracy, 0..1.
    pub accuracy: f32,
    /// Accuracy lost while moving, 0..1.
    pub movement_accuracy_penalty: f32,
    /// Fraction of accumulated recoil removed per second.
    pub recoil_recovery_speed: f32,
    pub range: f32,
    pub bullet_speed: f32,
    /// Per-shot kick (x = yaw, y = pitch, radians), indexed by shots fired from a full magazine.
    pub recoil_pattern: Vec<Vec2>,
}

impl WeaponStats {
    /// Minimum seconds between two shots.
    pub fn shot_interval(&self) -> f64 {
        1.0 / self.fire_rate as f64
    }

    /// Recoil kick for the shot fired with `shots_fired` rounds already gone from a full magazine.
    /// Sustained fire past the end of the pattern repeats the last entry.
    pub fn recoil_at(&self, shots_fired: u32) -> Vec2 {
        let last = self.recoil_pattern.len().saturating_sub(1);
        let index = (shots_fired as usize).min(last);
        self.recoil_pattern.get(index).copied().unwrap_or(Vec2::ZERO)
    }

    /// Reject stats that would break the firing state machine.
    pub fn validate(&self, weapon: WeaponType) -> Result<(), CatalogError> {
        let invalid = |reason| Err(CatalogError::InvalidStats { weapon, reason });
        if self.damage == 0 {
            return invalid("damage must be positive");
        }
        if !(self.fire_rate > 0.0) {
            return invalid("fire_rate must be positive");
        }
        if self.magazine_size == 0 {
            return invalid("magazine_size must be positive");
        }
        if !(self.reload_time > 0.0) {
            return invalid("reload_time must be positive");
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            return invalid("accuracy must be within 0..1");
        }
        if !(0.0..=1.0).contains(&self.movement_accuracy_penalty) {
            return invalid("movement_accuracy_penalty must be within 0..1");
        }
        if !(self.recoil_recovery_speed > 0.0) {
            return invalid("recoil_recovery_speed must be positive");
        }
        if self.recoil_pattern.is_empty() {
            return invalid("recoil_pattern must not be empty");
        }
        Ok(())
    }
}

/// Fixed mapping from weapon type to stats, built once at startup.
#[derive(Debug, Clone)]
pub struct WeaponCatalog {
    entries: HashMap<WeaponType, Arc<WeaponStats>>,
}

impl WeaponCatalog {
    /// The tuned catalog shipped with the game.
    pub fn standard() -> Self {
        let entries = WeaponType::ALL
            .into_iter()
            .map(|t| (t, Arc::new(standard_stats(t))))
            .collect();
        Self { entries }
    }

    /// Build a catalog from explicit entries, validating each one.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (WeaponType, WeaponStats)>,
    ) -> Result<Self, CatalogError> {
        let mut map = HashMap::new();
        for (weapon, stats) in entries {
            stats.validate(weapon)?;
            map.insert(weapon, Arc::new(stats));
        }
        Ok(Self { entries: map })
    }

    /// Parse a RON map of `WEAPON_TYPE: (stats...)`.
    pub fn from_ron_str(data: &str) -> Result<Self, CatalogError> {
        let entries: HashMap<WeaponType, WeaponStats> = ron::from_str(data)?;
        Self::from_entries(entries)
    }

    /// Load a RON catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_ron_str(&data)?;
        log::info!("Loaded {} weapon entries from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Look up stats for a weapon type. `None` if the catalog has no entry.
    pub fn stats_of(&self, weapon: WeaponType) -> Option<Arc<WeaponStats>> {
        self.entries.get(&weapon).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_stats(weapon: WeaponType) -> WeaponStats {
    // (damage, fire_rate, magazine, reload, accuracy, move penalty, recovery, range, bullet speed)
    let (damage, fire_rate, magazine_size, reload_time, accuracy, penalty, recovery, range, bullet_speed) =
        match weapon {
            WeaponType::Rifle => (25, 8.0, 30, 2.5, 0.8, 0.2, 0.9, 100.0, 400.0),
            WeaponType::Smg => (15, 12.0, 25, 1.8, 0.7, 0.1, 1.2, 50.0, 350.0),
            WeaponType::Pistol => (20, 5.0, 12, 1.5, 0.85, 0.1, 1.0, 40.0, 300.0),
            WeaponType::Sniper => (100, 1.0, 5, 3.0, 0.95, 0.4, 0.8, 200.0, 500.0),
        };

    let recoil_pattern = match weapon {
        WeaponType::Rifle => vec![
            Vec2::new(0.005, 0.01),
            Vec2::new(0.01, 0.015),
            Vec2::new(0.015, 0.02),
            Vec2::new(0.02, 0.025),
            Vec2::new(0.01, 0.02),
        ],
        WeaponType::Smg => vec![
            Vec2::new(0.003, 0.006),
            Vec2::new(0.005, 0.01),
            Vec2::new(0.008, 0.012),
            Vec2::new(0.01, 0.015),
        ],
        WeaponType::Pistol => vec![Vec2::new(0.01, 0.02), Vec2::new(0.02, 0.03)],
        WeaponType::Sniper => vec![Vec2::new(0.02, 0.03), Vec2::new(0.03, 0.04)],
    };

    WeaponStats {
        damage,
        fire_rate,
        magazine_size,
        reload_time,
        accuracy,
        movement_accuracy_penalty: penalty,
        recoil_recovery_speed: recovery,
        range,
        bullet_speed,
        recoil_pattern,
    }
}
