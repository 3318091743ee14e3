//! Core of the ray marcher: the SDF scene graph and everything that
//! queries it.
//!
//! This crate provides:
//!
//! - **Surface types**: `Material`, `Hit`
//! - **SDF graph**: an arena of primitive and combinator nodes (`SdfArena`)
//! - **Scene**: top-level roots, point lights, sphere marching and shading
//!
//! # Example
//!
//! ```ignore
//! use rm_core::{Material, Scene};
//! use rm_math::{Ray, Vec3};
//!
//! let mut scene = Scene::new();
//! let ball = scene.nodes_mut().sphere(Vec3::ZERO, 1.0);
//! scene.nodes_mut().set_material(ball, Material::new(Vec3::new(0.9, 0.2, 0.2)))?;
//! scene.add(ball)?;
//! scene.add_light(Vec3::new(5.0, 5.0, 5.0), Vec3::ONE, 1.0);
//!
//! let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
//! if let Some(hit) = scene.march(&ray, 100.0, 0.001) {
//!     let color = scene.lighting(&hit, &ray);
//! }
//! ```

pub mod material;
pub mod scene;
pub mod sdf;

// Re-export commonly used types
pub use material::{Color, Hit, Material};
pub use scene::{
    Light, Scene, SceneError, DEFAULT_EPSILON, DEFAULT_MAX_DISTANCE, MAX_MARCH_STEPS,
    SURFACE_BIAS,
};
pub use sdf::{NodeId, SdfArena, SdfError, SdfKind, SdfNode, SdfSample, NORMAL_EPSILON};
