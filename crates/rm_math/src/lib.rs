//! Math types shared by the ray marcher.
//!
//! `Vec3` and friends come straight from glam; this crate only adds the
//! handful of types the marcher needs on top.
//!
//! Normalizing a zero-length vector is a precondition violation: glam
//! returns NaN components and nothing downstream tries to recover. Callers
//! must keep camera position != target and light position != shading point.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
