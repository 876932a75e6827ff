//! Camera handles consumed by gameplay systems.
//!
//! Weapon code never owns a renderer camera. It only needs to read the eye
//! position and read/write the view orientation, which is what
//! [`ViewHandle`] exposes.

use glam::{EulerRot, Quat, Vec3};

use crate::transform::Transform;

/// Narrow capability over a first-person view: read position, read/write orientation.
pub trait ViewHandle {
    /// Eye position in world space.
    fn position(&self) -> Vec3;

    /// Current view orientation.
    fn orientation(&self) -> Quat;

    /// Replace the view orientation.
    fn set_orientation(&mut self, orientation: Quat);

    /// Compose a rotation about a local axis onto the current orientation.
    fn rotate_local(&mut self, axis: Vec3, angle: f32) {
        let rotated = self.orientation() * Quat::from_axis_angle(axis, angle);
        self.set_orientation(rotated.normalize());
    }

    /// Forward direction (negative Z) under the current orientation.
    fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }
}

impl ViewHandle for Transform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        self.rotation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.rotation = orientation;
    }
}

impl<T: ViewHandle + ?Sized> ViewHandle for &mut T {
    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn orientation(&self) -> Quat {
        (**self).orientation()
    }

    fn set_orientation(&mut self, orientation: Quat) {
        (**self).set_orientation(orientation)
    }
}

/// Mouse-look camera with yaw/pitch controls.
#[derive(Debug, Clone)]
pub struct FpsCamera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Mouse sensitivity for look controls.
    pub sensitivity: f32,
    /// Current pitch (up/down rotation) in radians.
    pitch: f32,
    /// Current yaw (left/right rotation) in radians.
    yaw: f32,
}

impl Default for FpsCamera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 70.0,
            sensitivity: 0.002,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl FpsCamera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Process mouse movement for FPS look controls.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * self.sensitivity;
        self.pitch -= delta_y * self.sensitivity;
        self.apply_yaw_pitch();
    }

    fn apply_yaw_pitch(&mut self) {
        // Clamp pitch to prevent flipping
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        self.transform.rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
    }
}

impl ViewHandle for FpsCamera {
    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn orientation(&self) -> Quat {
        self.transform.rotation
    }

    /// Orientation writes (recoil kicks, corrections) are folded back into yaw/pitch
    /// so later mouse input continues from where the kick left the view. Roll is
    /// discarded, so a kick and its inverse cancel only to second order.
    fn set_orientation(&mut self, orientation: Quat) {
        let (yaw, pitch, _roll) = orientation.normalize().to_euler(EulerRot::YXZ);
        self.yaw = yaw;
        self.pitch = pitch;
        self.apply_yaw_pitch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_local_on_transform_pitches_view() {
        let mut t = Transform::default();
        t.rotate_local(Vec3::X, 0.2);
        let fwd = ViewHandle::forward(&t);
        assert!((fwd.y - 0.2f32.sin()).abs() < 1e-5);
    }

    fn nudge(mut view: impl ViewHandle) {
        view.rotate_local(Vec3::Y, 0.5);
    }

    #[test]
    fn mut_ref_forwards_to_target() {
        let mut t = Transform::default();
        nudge(&mut t);
        assert!(t.rotation.angle_between(Quat::IDENTITY) > 0.49);
    }

    #[test]
    fn fps_camera_folds_kicks_into_pitch() {
        let mut cam = FpsCamera::new(Vec3::new(0.0, 1.7, 0.0));
        cam.rotate_local(Vec3::X, 0.03);
        assert!((cam.pitch() - 0.03).abs() < 1e-5);
        assert!(cam.yaw().abs() < 1e-5);

        // Mouse look continues from the kicked pitch.
        cam.process_mouse(0.0, 5.0);
        assert!((cam.pitch() - (0.03 - 5.0 * cam.sensitivity)).abs() < 1e-5);
    }

    #[test]
    fn fps_camera_kick_and_inverse_round_trip() {
        let mut cam = FpsCamera::default();
        cam.process_mouse(-0.5 / cam.sensitivity, -0.3 / cam.sensitivity);
        let start = ViewHandle::forward(&cam);

        cam.rotate_local(Vec3::X, 0.02);
        cam.rotate_local(Vec3::Y, 0.01);
        assert!((ViewHandle::forward(&cam) - start).length() > 0.01);

        cam.rotate_local(Vec3::Y, -0.01);
        cam.rotate_local(Vec3::X, -0.02);
        assert!((ViewHandle::forward(&cam) - start).length() < 1e-3);
        assert!((cam.yaw() - 0.5).abs() < 1e-3);
        assert!((cam.pitch() - 0.3).abs() < 1e-3);
    }

    #[test]
    fn fps_camera_pitch_is_clamped() {
        let mut cam = FpsCamera::default();
        cam.process_mouse(0.0, -100_000.0);
        assert!(cam.pitch() < std::f32::consts::FRAC_PI_2);
    }
}
