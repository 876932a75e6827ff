//! Weapon feel tuning and startup configuration. Loaded from weapons.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::WeaponCatalog;

/// Feel constants for recoil, accuracy and view-model motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTuning {
    /// Share of each recoil kick that persists in the aim accumulator (the camera gets all of it).
    #[serde(default = "default_aim_recoil_fraction")]
    pub aim_recoil_fraction: f32,
    /// Accuracy bonus while aiming down sights.
    #[serde(default = "default_aim_accuracy_bonus")]
    pub aim_accuracy_bonus: f32,
    /// Accuracy never drops below this.
    #[serde(default = "default_min_accuracy")]
    pub min_accuracy: f32,
    /// Spread at zero accuracy, added to the forward vector's x and y.
    #[serde(default = "default_spread_scale")]
    pub spread_scale: f32,
    /// Recoil accumulator snaps to zero below this length.
    #[serde(default = "default_recoil_epsilon")]
    pub recoil_epsilon: f32,
    /// Camera jerk decay rate per second.
    #[serde(default = "default_jerk_decay")]
    pub jerk_decay: f32,
    /// Camera jerk is cleared below this length.
    #[serde(default = "default_jerk_epsilon")]
    pub jerk_epsilon: f32,
    /// View-model approach rate per second toward its target pose.
    #[serde(default = "default_viewmodel_rate")]
    pub viewmodel_rate: f32,
    /// Muzzle flash lifetime in seconds.
    #[serde(default = "default_muzzle_flash_duration")]
    pub muzzle_flash_duration: f32,
}

fn default_aim_recoil_fraction() -> f32 {
    0.4
}
fn default_aim_accuracy_bonus() -> f32 {
    0.15
}
fn default_min_accuracy() -> f32 {
    0.1
}
fn default_spread_scale() -> f32 {
    0.07
}
fn default_recoil_epsilon() -> f32 {
    1e-4
}
fn default_jerk_decay() -> f32 {
    15.0
}
fn default_jerk_epsilon() -> f32 {
    1e-3
}
fn default_viewmodel_rate() -> f32 {
    4.0
}
fn default_muzzle_flash_duration() -> f32 {
    0.05
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            aim_recoil_fraction: default_aim_recoil_fraction(),
            aim_accuracy_bonus: default_aim_accuracy_bonus(),
            min_accuracy: default_min_accuracy(),
            spread_scale: default_spread_scale(),
            recoil_epsilon: default_recoil_epsilon(),
            jerk_decay: default_jerk_decay(),
            jerk_epsilon: default_jerk_epsilon(),
            viewmodel_rate: default_viewmodel_rate(),
            muzzle_flash_duration: default_muzzle_flash_duration(),
        }
    }
}

/// Persistent weapon settings. Loaded from `weapons.ron` in the current directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponConfig {
    #[serde(default)]
    pub tuning: WeaponTuning,
    /// Optional RON catalog replacing the built-in stats table.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Fixed seed for shot spread; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl WeaponConfig {
    /// Load config from `weapons.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `weapons.ron`. Logs on error.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// The configured catalog, falling back to the built-in one if the override can't be used.
    pub fn catalog(&self) -> WeaponCatalog {
        let Some(path) = &self.catalog_path else {
            return WeaponCatalog::standard();
        };
        match WeaponCatalog::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("{}, using built-in catalog", e);
                WeaponCatalog::standard()
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("weapons.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("weapons-config-{}-{}", std::process::id(), name))
    }

    #[test]
    fn partial_ron_fills_missing_fields_with_defaults() {
        let config: WeaponConfig = ron::from_str("(tuning: (spread_scale: 0.1), seed: Some(7))").unwrap();
        assert_eq!(config.seed, Some(7));
        assert!((config.tuning.spread_scale - 0.1).abs() < 1e-6);
        assert!((config.tuning.aim_recoil_fraction - 0.4).abs() < 1e-6);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn missing_or_invalid_file_yields_defaults() {
        let missing = WeaponConfig::load_from(&scratch_path("missing.ron"));
        assert_eq!(missing.tuning, WeaponTuning::default());

        let path = scratch_path("invalid.ron");
        std::fs::write(&path, "not ron at all (").unwrap();
        let invalid = WeaponConfig::load_from(&path);
        assert_eq!(invalid.tuning, WeaponTuning::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = scratch_path("saved.ron");
        let mut config = WeaponConfig::default();
        config.tuning.viewmodel_rate = 6.0;
        config.seed = Some(42);
        config.save_to(&path);

        let loaded = WeaponConfig::load_from(&path);
        assert_eq!(loaded.seed, Some(42));
        assert!((loaded.tuning.viewmodel_rate - 6.0).abs() < 1e-6);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreadable_catalog_override_falls_back_to_standard() {
        let config = WeaponConfig {
            catalog_path: Some(scratch_path("no-such-catalog.ron")),
            ..Default::default()
        };
        assert_eq!(config.catalog().len(), 4);
    }
}
