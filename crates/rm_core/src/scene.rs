//! Scene: SDF roots, lights, sphere marching and direct lighting.
//!
//! A scene is built once by authoring code and then only read. Rendering
//! borrows it immutably, so it can be shared across worker threads without
//! any locking.

use rm_math::{reflect, Interval, Ray, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sdf::{NodeId, SdfArena, SdfSample};
use crate::{Color, Hit};

/// Iteration cap for a single march.
pub const MAX_MARCH_STEPS: u32 = 100;

/// Default travel bound for camera and reflection rays.
pub const DEFAULT_MAX_DISTANCE: f32 = 100.0;

/// Default surface tolerance.
pub const DEFAULT_EPSILON: f32 = 0.001;

/// Offset along the normal for rays leaving a surface.
///
/// Must stay above `DEFAULT_EPSILON` or shadow and reflection rays report
/// the surface they start on.
pub const SURFACE_BIAS: f32 = 0.002;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Root {0:?} is not a node of this scene")]
    UnknownRoot(NodeId),
}

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

/// Top-level SDF roots plus lighting.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: SdfArena,
    roots: Vec<NodeId>,
    lights: Vec<Light>,
    ambient: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with a dim grey ambient light.
    pub fn new() -> Self {
        Self {
            nodes: SdfArena::new(),
            roots: Vec::new(),
            lights: Vec::new(),
            ambient: Color::splat(0.1),
        }
    }

    /// The node arena.
    pub fn nodes(&self) -> &SdfArena {
        &self.nodes
    }

    /// Mutable access to the node arena, for building shapes.
    pub fn nodes_mut(&mut self) -> &mut SdfArena {
        &mut self.nodes
    }

    /// Add a top-level object.
    pub fn add(&mut self, root: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains(root) {
            log::debug!(
                "Rejected root {:?}: arena has only {} nodes",
                root,
                self.nodes.len()
            );
            return Err(SceneError::UnknownRoot(root));
        }
        self.roots.push(root);
        Ok(())
    }

    /// Top-level objects in insertion order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn set_ambient_light(&mut self, color: Color) {
        self.ambient = color;
    }

    pub fn ambient_light(&self) -> Color {
        self.ambient
    }

    /// Add a point light.
    pub fn add_light(&mut self, position: Vec3, color: Color, intensity: f32) {
        self.lights.push(Light {
            position,
            color,
            intensity,
        });
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Closest root at `p` together with its sample.
    ///
    /// Roots are visited in insertion order and the first one wins a tie.
    pub fn closest(&self, p: Vec3) -> Option<(NodeId, SdfSample)> {
        let mut closest: Option<(NodeId, SdfSample)> = None;
        for &root in &self.roots {
            let sample = self.nodes.sample(root, p);
            if closest.map_or(true, |(_, best)| sample.distance < best.distance) {
                closest = Some((root, sample));
            }
        }
        closest
    }

    /// Sphere-march `ray` through the scene.
    ///
    /// Steps by the minimum distance over all roots until that distance
    /// drops below `epsilon` (hit), the ray travels past `max_distance`, or
    /// `MAX_MARCH_STEPS` is reached. The last two are misses.
    pub fn march(&self, ray: &Ray, max_distance: f32, epsilon: f32) -> Option<Hit> {
        let range = Interval::new(0.0, max_distance);
        let mut t = 0.0;

        for _ in 0..MAX_MARCH_STEPS {
            let position = ray.at(t);
            let (root, sample) = self.closest(position)?;

            if sample.distance < epsilon {
                return Some(Hit {
                    distance: t,
                    position,
                    normal: self.nodes.normal(root, position),
                    material: self.nodes.material(sample.leaf),
                });
            }

            t += sample.distance;
            if !range.contains(t) {
                return None;
            }
        }

        log::trace!("March gave up after {} steps at t = {}", MAX_MARCH_STEPS, t);
        None
    }

    /// Returns true if any surface lies between the hit and the light.
    pub fn is_occluded(&self, hit: &Hit, light: &Light) -> bool {
        let to_light = light.position - hit.position;
        let shadow_ray = Ray::new(hit.position + hit.normal * SURFACE_BIAS, to_light.normalize());
        self.march(&shadow_ray, to_light.length(), DEFAULT_EPSILON)
            .is_some()
    }

    /// Direct lighting at a hit: ambient, then per light a shadowed diffuse
    /// term and a Phong specular term for metals, then emission.
    pub fn lighting(&self, hit: &Hit, ray: &Ray) -> Color {
        let material = &hit.material;
        let mut color = material.albedo * self.ambient;

        for light in &self.lights {
            let light_dir = (light.position - hit.position).normalize();
            let diffuse = hit.normal.dot(light_dir).max(0.0);

            if self.is_occluded(hit, light) {
                continue;
            }

            color += material.albedo * light.color * diffuse * light.intensity;

            if material.metallic > 0.0 {
                let reflect_dir = reflect(ray.direction, hit.normal);
                let spec = reflect_dir
                    .dot(light_dir)
                    .max(0.0)
                    .powf(32.0 * (1.0 - material.roughness));
                color += material.albedo * light.color * spec * material.metallic * light.intensity;
            }
        }

        if material.emissive > 0.0 {
            color += material.albedo * material.emissive;
        }

        color
    }
}
