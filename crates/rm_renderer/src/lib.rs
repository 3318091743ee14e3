//! Sphere-marching renderer.
//!
//! Turns an `rm_core::Scene` seen through a `Camera` into an 8-bit RGB
//! `Image`. Rows are handed out to a fixed pool of worker threads; each
//! pixel averages a few jittered samples of a recursive trace (direct
//! lighting plus mirror reflections) and is tone-mapped on the way out.

mod background;
mod buffer;
mod camera;
mod renderer;
mod rows;

pub use background::SkyGradient;
pub use buffer::{Image, Rgb8};
pub use camera::Camera;
pub use renderer::{tone_map, RenderError, RenderSettings, Renderer, MIRROR_WEIGHT};
pub use rows::{assemble, RowQueue, RowResult};

/// Re-export the scene types renderer users need.
pub use rm_core::{Color, Light, Material, NodeId, Scene};
pub use rm_math::{Ray, Vec3};
