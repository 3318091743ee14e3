//! Pinhole camera for primary ray generation.

use rm_math::{Ray, Vec3};

/// Reference up direction for building the camera basis.
const WORLD_UP: Vec3 = Vec3::Y;

/// Above this |forward.y| the world-up cross product degenerates.
const VERTICAL_THRESHOLD: f32 = 0.99999;

/// Camera mapping normalized image coordinates to world rays.
///
/// The orthonormal basis is recomputed whenever position, target or field
/// of view change. Position and target must differ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,

    forward: Vec3,
    right: Vec3,
    up: Vec3,

    /// Vertical field of view in degrees
    fov: f32,
    aspect: f32,
    tan_half_fov: f32,
}

impl Camera {
    /// Create a camera at (0, 0, 5) looking at the origin.
    pub fn new(fov: f32, aspect: f32) -> Self {
        Self::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, fov, aspect)
    }

    /// Create a camera at `position` looking at `target`.
    pub fn look_at(position: Vec3, target: Vec3, fov: f32, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            target,
            forward: -Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            fov,
            aspect,
            tan_half_fov: 0.0,
        };
        camera.update_basis();
        camera
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_basis();
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.update_basis();
    }

    /// Set the vertical field of view in degrees.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.update_basis();
    }

    /// Update aspect ratio (e.g., on window resize). The basis is unaffected.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    /// Generate the ray through image coordinates `(u, v)` in [0, 1].
    ///
    /// `v` grows downward: `v = 0` is the top row of the image.
    pub fn ray(&self, u: f32, v: f32) -> Ray {
        let nx = (2.0 * u - 1.0) * self.aspect * self.tan_half_fov;
        let ny = (1.0 - 2.0 * v) * self.tan_half_fov;

        let direction = self.forward + self.right * nx + self.up * ny;
        Ray::new(self.position, direction.normalize())
    }

    fn update_basis(&mut self) {
        debug_assert!(
            self.position != self.target,
            "camera position and target must differ"
        );

        self.tan_half_fov = (self.fov * 0.5).to_radians().tan();
        self.forward = (self.target - self.position).normalize();

        if self.forward.y.abs() > VERTICAL_THRESHOLD {
            // Looking straight up or down: pick an axis-aligned frame
            self.right = Vec3::X;
            self.up = if self.forward.y > 0.0 {
                Vec3::new(0.0, 0.0, -1.0)
            } else {
                Vec3::Z
            };
        } else {
            self.right = WORLD_UP.cross(self.forward).normalize();
            self.up = self.forward.cross(self.right).normalize();
        }
    }
}
