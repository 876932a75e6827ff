//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Rotate around a local axis (post-multiplied, so the axis is in the transform's own frame).
    pub fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    /// Rotate around the local X axis (pitch).
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate_local(Vec3::X, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_faces_negative_z() {
        let t = Transform::default();
        assert!((t.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn positive_pitch_tilts_forward_up() {
        let mut t = Transform::default();
        t.rotate_x(0.1);
        assert!(t.forward().y > 0.0);
        assert!((t.forward().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn local_rotation_inverts_cleanly() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.rotate_local(Vec3::X, 0.3);
        t.rotate_local(Vec3::X, -0.3);
        assert!(t.rotation.angle_between(Quat::IDENTITY) < 1e-5);
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
    }
}
