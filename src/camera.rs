use glam::Vec3;

use crate::transform::{Matrix4, look_at, perspective};

/// A simple camera for 3D scenes.
///
/// Holds where the camera sits, what it looks at, and the projection
/// parameters. Defaults to the rotating-cube setup: three units back on +Z,
/// looking at the origin with a 45° vertical field of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.eye = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, target_x: f32, target_y: f32, target_z: f32) -> Self {
        self.target = Vec3::new(target_x, target_y, target_z);
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// World to camera transform.
    pub fn view_matrix(&self) -> Matrix4 {
        look_at(self.eye, self.target, self.up)
    }

    /// Camera to clip transform for a surface with the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4 {
        perspective(self.fov, aspect, self.near, self.far)
    }

    /// Unit vector from the eye towards the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sees_origin_mid_frustum() {
        let camera = Camera::new();
        let clip = camera.projection_matrix(800.0 / 600.0) * camera.view_matrix();

        let origin = clip.transform_point(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-6 && origin.y.abs() < 1e-6);
        assert!(origin.z > -1.0 && origin.z < 1.0, "depth {}", origin.z);
    }

    #[test]
    fn builder_sets_fields() {
        let camera = Camera::new()
            .at(1.0, 2.0, 3.0)
            .looking_at(0.0, 2.0, 0.0)
            .with_fov(90.0)
            .with_clip(0.5, 50.0);

        assert_eq!(camera.eye, Vec3::new(1.0, 2.0, 3.0));
        assert!((camera.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!((camera.near, camera.far), (0.5, 50.0));
        assert!((camera.forward().length() - 1.0).abs() < 1e-6);
    }
}
