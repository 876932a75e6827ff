//! Core engine types shared by gameplay crates.
//!
//! - Transform and spatial components
//! - Monotonic clocks and frame timing
//! - Camera handles for first-person views

pub mod camera;
pub mod clock;
pub mod time;
pub mod transform;

pub use camera::*;
pub use clock::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{EulerRot, Quat, Vec2, Vec3};
