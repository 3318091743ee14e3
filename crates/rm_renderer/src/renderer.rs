//! Parallel sphere-marching renderer.
//!
//! Implements:
//! - Row-parallel rendering on a fixed rayon pool
//! - Supersampling with a fixed jitter grid
//! - Recursive mirror reflections with configurable depth
//! - Exposure and gamma tone mapping

use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use rm_core::{Color, Scene, DEFAULT_EPSILON, DEFAULT_MAX_DISTANCE, SURFACE_BIAS};
use rm_math::{reflect, Interval, Ray};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rows::{assemble, RowQueue, RowResult};
use crate::{Camera, Image, Rgb8, SkyGradient};

/// Weight of the reflected color on mirror surfaces.
pub const MIRROR_WEIGHT: f32 = 0.8;

/// Display gamma used when encoding 8-bit output.
const GAMMA: f32 = 2.2;

/// Configuration errors. Rendering itself never fails.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    InvalidSamples,

    #[error("Max bounces must be at least 1")]
    InvalidBounces,

    #[error("Exposure must be a positive finite number, got {0}")]
    InvalidExposure(f32),

    #[error("Thread count must be at least 1")]
    InvalidThreads,

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Linear multiplier applied before gamma encoding
    pub exposure: f32,
    /// Trace depth; 1 means primary rays only, no reflections
    pub max_bounces: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Worker threads; `None` uses the available hardware parallelism
    pub threads: Option<usize>,
    /// Color of rays that escape the scene
    pub background: SkyGradient,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            exposure: 1.0,
            max_bounces: 4,
            samples_per_pixel: 1,
            threads: None,
            background: SkyGradient::default(),
        }
    }
}

impl RenderSettings {
    /// Check the settings before any rendering happens.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSamples);
        }
        if self.max_bounces == 0 {
            return Err(RenderError::InvalidBounces);
        }
        if !self.exposure.is_finite() || self.exposure <= 0.0 {
            return Err(RenderError::InvalidExposure(self.exposure));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidThreads);
        }
        Ok(())
    }
}

/// Renders scenes into images with a fixed pool of worker threads.
///
/// The scene and camera are only borrowed for the duration of `render`, so
/// the borrow checker keeps them immutable while workers are running.
pub struct Renderer {
    settings: RenderSettings,
    pool: ThreadPool,
}

impl Renderer {
    /// Create a renderer with default settings at the given resolution.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_settings(RenderSettings {
            width,
            height,
            ..Default::default()
        })
    }

    /// Create a renderer from explicit settings.
    pub fn with_settings(settings: RenderSettings) -> Result<Self, RenderError> {
        settings.validate()?;
        let pool = build_pool(settings.threads)?;
        Ok(Self { settings, pool })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.settings.samples_per_pixel
    }

    /// Number of worker threads used by `render`.
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Apply a change to the settings only if the result is valid.
    fn update(&mut self, change: impl FnOnce(&mut RenderSettings)) -> Result<(), RenderError> {
        let mut next = self.settings.clone();
        change(&mut next);
        next.validate()?;
        self.settings = next;
        Ok(())
    }

    pub fn set_exposure(&mut self, exposure: f32) -> Result<(), RenderError> {
        self.update(|s| s.exposure = exposure)
    }

    pub fn set_max_bounces(&mut self, bounces: u32) -> Result<(), RenderError> {
        self.update(|s| s.max_bounces = bounces)
    }

    pub fn set_samples_per_pixel(&mut self, samples: u32) -> Result<(), RenderError> {
        self.update(|s| s.samples_per_pixel = samples)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.update(|s| {
            s.width = width;
            s.height = height;
        })
    }

    /// Change the worker count. Rebuilds the thread pool.
    pub fn set_threads(&mut self, threads: Option<usize>) -> Result<(), RenderError> {
        let mut next = self.settings.clone();
        next.threads = threads;
        next.validate()?;
        self.pool = build_pool(threads)?;
        self.settings = next;
        Ok(())
    }

    pub fn set_sky_colors(&mut self, horizon: Color, zenith: Color) {
        self.settings.background.sky_horizon = horizon;
        self.settings.background.sky_zenith = zenith;
    }

    pub fn set_ground_colors(&mut self, horizon: Color, nadir: Color) {
        self.settings.background.ground_horizon = horizon;
        self.settings.background.ground_nadir = nadir;
    }

    /// Render a full frame.
    ///
    /// Blocks until every row is done. Every worker of the pool pulls rows
    /// from a shared counter; the finished rows are merged afterwards.
    pub fn render(&self, scene: &Scene, camera: &Camera) -> Image {
        let start = Instant::now();
        let RenderSettings {
            width,
            height,
            exposure,
            ..
        } = self.settings;

        if scene.is_empty() {
            log::warn!("Rendering a scene with no objects; only the background will show");
        }

        let queue = RowQueue::new(height);
        let batches = self.pool.broadcast(|_| {
            let mut rows = Vec::new();
            while let Some(y) = queue.next_row() {
                let pixels = (0..width)
                    .map(|x| tone_map(self.render_pixel(scene, camera, x, y), exposure))
                    .collect();
                rows.push(RowResult::new(y, pixels));
            }
            rows
        });

        log::debug!(
            "Row distribution across workers: {:?}",
            batches.iter().map(Vec::len).collect::<Vec<_>>()
        );

        let image = assemble(width, height, batches.into_iter().flatten());

        log::info!(
            "Rendered {}x{} @ {} spp on {} threads in {:?}",
            width,
            height,
            self.settings.samples_per_pixel,
            self.thread_count(),
            start.elapsed()
        );

        image
    }

    /// Average the jittered samples of pixel (x, y), in linear color.
    pub fn render_pixel(&self, scene: &Scene, camera: &Camera, x: u32, y: u32) -> Color {
        let samples = self.settings.samples_per_pixel;
        let grid = jitter_grid(samples);
        let width = self.settings.width as f32;
        let height = self.settings.height as f32;

        let mut pixel_color = Color::ZERO;
        for s in 0..samples {
            let (dx, dy) = sample_offset(s, grid);
            let u = (x as f32 + dx) / width;
            let v = (y as f32 + dy) / height;

            let ray = camera.ray(u, v);
            pixel_color += self.trace(&ray, scene, self.settings.max_bounces);
        }

        pixel_color / samples as f32
    }

    /// Compute the color seen along a ray.
    ///
    /// Direct lighting at the hit, plus a recursive bounce for near-mirror
    /// metals. `depth == 0` returns black.
    pub fn trace(&self, ray: &Ray, scene: &Scene, depth: u32) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let Some(hit) = scene.march(ray, DEFAULT_MAX_DISTANCE, DEFAULT_EPSILON) else {
            return self.settings.background.color(ray.direction);
        };

        let direct = scene.lighting(&hit, ray);

        if hit.material.is_mirror() {
            let reflected = Ray::new(
                hit.position + hit.normal * SURFACE_BIAS,
                reflect(ray.direction, hit.normal),
            );
            let reflected_color = self.trace(&reflected, scene, depth - 1);
            return direct + reflected_color * hit.material.albedo * MIRROR_WEIGHT;
        }

        direct
    }
}

fn build_pool(threads: Option<usize>) -> Result<ThreadPool, RenderError> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("rm-render-{i}"));
    if let Some(threads) = threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    log::debug!("Render pool ready with {} threads", pool.current_num_threads());
    Ok(pool)
}

/// Side length of the jitter grid for `samples` samples.
fn jitter_grid(samples: u32) -> u32 {
    ((samples as f32).sqrt().ceil() as u32).max(1)
}

/// Offset of sample `s` within the pixel, in pixels.
///
/// Up to four samples this is the 2x2 pattern (0, 0), (0.5, 0), (0, 0.5),
/// (0.5, 0.5).
#[inline]
fn sample_offset(s: u32, grid: u32) -> (f32, f32) {
    let step = 1.0 / grid as f32;
    ((s % grid) as f32 * step, (s / grid) as f32 * step)
}

/// Exposure, clamp and gamma-encode a linear color to 8 bits per channel.
pub fn tone_map(color: Color, exposure: f32) -> Rgb8 {
    let exposed = color * exposure;
    let encode = |c: f32| (Interval::UNIT.clamp(c).powf(1.0 / GAMMA) * 255.0) as u8;
    [encode(exposed.x), encode(exposed.y), encode(exposed.z)]
}
