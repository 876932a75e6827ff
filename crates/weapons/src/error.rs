//! Errors for fallible setup paths (catalog and config loading).
//!
//! The per-frame controller API never returns these; it reports refusals as `false`.

use std::path::PathBuf;

use crate::catalog::WeaponType;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read weapon catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid weapon catalog RON: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid stats for {weapon}: {reason}")]
    InvalidStats {
        weapon: WeaponType,
        reason: &'static str,
    },
}

/// A weapon type name that isn't one of RIFLE/SMG/PISTOL/SNIPER.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weapon type {0:?}")]
pub struct UnknownWeaponType(pub String);
