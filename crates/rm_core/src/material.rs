//! Surface description and hit records.

use rm_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB, typically 0-1 but unbounded above)
pub type Color = Vec3;

/// Shading parameters of a surface.
///
/// A plain value type: nodes copy it out when a hit is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Base color
    pub albedo: Color,
    /// 0 = dielectric, 1 = metal
    pub metallic: f32,
    /// 0 = smooth, 1 = rough
    pub roughness: f32,
    /// Self-illumination strength, added regardless of lights
    pub emissive: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Color::ONE,
            metallic: 0.0,
            roughness: 0.5,
            emissive: 0.0,
        }
    }
}

impl Material {
    /// Create a dielectric material with the given albedo.
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Set metallic and roughness factors.
    pub fn with_metal(mut self, metallic: f32, roughness: f32) -> Self {
        self.metallic = metallic;
        self.roughness = roughness;
        self
    }

    /// Set the emission strength.
    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    /// Near-mirror metals get a recursive reflection bounce.
    pub fn is_mirror(&self) -> bool {
        self.metallic > 0.9 && self.roughness < 0.1
    }
}

/// Record of a ray-surface intersection found by marching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray
    pub distance: f32,
    /// World-space position
    pub position: Vec3,
    /// Unit surface normal, estimated from the distance field gradient
    pub normal: Vec3,
    /// Material of the surface that produced the hit
    pub material: Material,
}

impl Default for Hit {
    fn default() -> Self {
        Self {
            distance: f32::INFINITY,
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: Material::default(),
        }
    }
}
