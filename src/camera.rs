//! Fixed perspective camera.
//!
//! The viewer looks down -Z at the anchor. Besides the view-projection
//! matrix, the camera answers how large the visible area is at the anchor's
//! depth, which is what the repulsor uses to map the pointer into the world.

use glam::{Mat4, Vec2, Vec3};

use crate::config::CameraConfig;

/// Perspective camera looking at a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: config.position,
            target: Vec3::ZERO,
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space half width and half height of the view at the target's depth.
    pub fn viewport_half_extents(&self, aspect: f32) -> Vec2 {
        let distance = self.position.distance(self.target);
        let half_height = (self.fov_degrees.to_radians() * 0.5).tan() * distance;
        Vec2::new(half_height * aspect, half_height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
