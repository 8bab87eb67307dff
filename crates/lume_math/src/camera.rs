use crate::Ray;
use glam::{Mat4, Vec3, Vec4};

/// Camera for 3D rendering.
///
/// Produces the view/projection matrices consumed by the rasterizer
/// and generates primary rays for the tracer by unprojecting pixel
/// centers through the inverse of those matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera looking from `position` towards `target`.
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Set the vertical field of view (radians).
    pub fn with_fov_y(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    /// Get the view matrix (world -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix (camera -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio (e.g. on resize).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Generate the primary ray through the center of pixel (px, py).
    ///
    /// Pixel (0, 0) is the top-left of the image; the pixel center is
    /// unprojected through the inverse projection, forced to z = -1 in
    /// view space, then rotated into world space.
    pub fn primary_ray(&self, px: u32, py: u32, width: u32, height: u32) -> Ray {
        let u = 2.0 * (px as f32 + 0.5) / width as f32 - 1.0;
        let v = 1.0 - 2.0 * (py as f32 + 0.5) / height as f32;

        let dir_clip = Vec4::new(u, v, -1.0, 1.0);
        let dir_view = self.projection_matrix().inverse() * dir_clip;
        let dir_view = Vec4::new(dir_view.x, dir_view.y, -1.0, 0.0);
        let dir_world = self.view_matrix().inverse() * dir_view;

        Ray::new(self.position, dir_world.truncate().normalize())
    }
}
