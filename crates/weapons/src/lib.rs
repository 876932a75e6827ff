//! First-person weapon handling: catalog, firing/reload state machine,
//! recoil and accuracy, and the viewmodel presentation driven by it.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod recoil;
pub mod scene;
pub mod shot;
pub mod viewmodel;
pub mod weapon;

pub use catalog::{WeaponCatalog, WeaponStats, WeaponType};
pub use config::{WeaponConfig, WeaponTuning};
pub use controller::WeaponController;
pub use error::{CatalogError, UnknownWeaponType};
pub use recoil::WeaponState;
pub use scene::{NullScene, PresentationFrame, ViewmodelScene};
pub use shot::ShotInfo;
pub use weapon::Weapon;
