//! Procedural sky/ground background for rays that escape the scene.

use rm_core::Color;
use rm_math::Vec3;
use serde::{Deserialize, Serialize};

/// Two-part vertical gradient: sky above the horizon, ground below.
///
/// Purely analytic; the ground here is never intersected against scene
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyGradient {
    pub sky_horizon: Color,
    pub sky_zenith: Color,
    pub ground_horizon: Color,
    pub ground_nadir: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            sky_horizon: Color::new(0.8, 0.9, 1.0),
            sky_zenith: Color::new(0.2, 0.4, 0.8),
            ground_horizon: Color::new(0.7, 0.75, 0.6),
            ground_nadir: Color::new(0.3, 0.35, 0.2),
        }
    }
}

impl SkyGradient {
    /// Background color seen along a unit `direction`.
    ///
    /// The blend factor is `sqrt(|y|)`, which widens the bright band around
    /// the horizon.
    pub fn color(&self, direction: Vec3) -> Color {
        let t = direction.y;
        if t >= 0.0 {
            let g = t.sqrt();
            self.sky_horizon * (1.0 - g) + self.sky_zenith * g
        } else {
            let g = (-t).min(1.0).sqrt();
            self.ground_horizon * (1.0 - g) + self.ground_nadir * g
        }
    }
}
