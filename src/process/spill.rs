//! Key-colour spill suppression.
//!
//! Silhouette edges absorb green bleed from the key background during
//! generation and encoding. This pass desaturates green-dominant opaque
//! pixels, strongly next to cleared background and gently elsewhere, and
//! feathers the alpha of heavily spilled edge pixels.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::PixelSurface;

/// Spill-suppression tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpillConfig {
    /// Pixels whose green excess is at or below this are left alone.
    pub min_excess: i32,
    /// Excess at which an edge pixel is fully desaturated.
    pub edge_falloff: f64,
    /// Excess divisor for pixels away from the edge.
    pub interior_falloff: f64,
    /// Upper bound on the correction strength away from the edge.
    pub interior_cap: f64,
    /// Share of the removed green added back to red.
    pub red_lift: f64,
    /// Share of the removed green added back to blue.
    pub blue_lift: f64,
    /// Edge pixels with more excess than this lose alpha.
    pub erosion_excess: i32,
    /// Alpha lost per unit of excess above `erosion_excess`.
    pub erosion_gain: f64,
}

impl Default for SpillConfig {
    fn default() -> Self {
        Self {
            min_excess: 10,
            edge_falloff: 120.0,
            interior_falloff: 180.0,
            interior_cap: 0.5,
            red_lift: 0.28,
            blue_lift: 0.35,
            erosion_excess: 70,
            erosion_gain: 0.65,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpillSuppressor {
    config: SpillConfig,
}

impl SpillSuppressor {
    pub fn new(config: SpillConfig) -> Self {
        Self { config }
    }

    /// Run one correction pass over every opaque pixel.
    ///
    /// "Near transparent" is judged against the alpha the surface had when
    /// the pass started, so the result does not depend on visiting order
    /// and rows are corrected in parallel. Returns the number of pixels
    /// adjusted.
    pub fn suppress(&self, surface: &mut PixelSurface) -> usize {
        let (w, h) = surface.size();
        if w == 0 || h == 0 {
            return 0;
        }
        let (w, h) = (w as usize, h as usize);

        let cleared: Vec<bool> = surface.as_raw().chunks_exact(4).map(|px| px[3] == 0).collect();
        let near_transparent = |x: usize, y: usize| {
            (x + 1 < w && cleared[y * w + x + 1])
                || (x > 0 && cleared[y * w + x - 1])
                || (y + 1 < h && cleared[(y + 1) * w + x])
                || (y > 0 && cleared[(y - 1) * w + x])
        };

        let cfg = &self.config;
        let adjusted: usize = surface
            .as_raw_mut()
            .par_chunks_exact_mut(w * 4)
            .enumerate()
            .map(|(y, row)| {
                let mut count = 0;
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    if px[3] == 0 {
                        continue;
                    }
                    if correct_pixel(cfg, px, || near_transparent(x, y)) {
                        count += 1;
                    }
                }
                count
            })
            .sum();

        debug!(adjusted, "suppressed key-colour spill");
        adjusted
    }
}

/// Clears pixels that are still plainly key green after background removal.
///
/// Off by default: it is a blunt cut that also removes legitimately green
/// artwork in that colour range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenCutoff {
    /// Green must be at least this.
    pub min_green: u8,
    /// Red and blue must both be at most this.
    pub max_other: u8,
}

impl Default for GreenCutoff {
    fn default() -> Self {
        Self {
            min_green: 170,
            max_other: 80,
        }
    }
}

impl GreenCutoff {
    /// Zero the alpha of every visible pixel in the cutoff range. Returns
    /// the number of pixels cleared.
    pub fn apply(&self, surface: &mut PixelSurface) -> usize {
        let mut cleared = 0;
        for px in surface.as_raw_mut().chunks_exact_mut(4) {
            let visible = px[3] != 0;
            if visible && px[1] >= self.min_green && px[0].max(px[2]) <= self.max_other {
                px[3] = 0;
                cleared += 1;
            }
        }
        debug!(cleared, "cut green residue");
        cleared
    }
}

/// Apply the correction to one RGBA pixel. Returns false when the pixel has
/// too little green excess to touch.
fn correct_pixel(cfg: &SpillConfig, px: &mut [u8], near_transparent: impl FnOnce() -> bool) -> bool {
    let (r, g, b, a) = (px[0] as i32, px[1] as i32, px[2] as i32, px[3] as i32);
    let excess = g - r.max(b);
    if excess <= cfg.min_excess {
        return false;
    }

    let near = near_transparent();
    let strength = if near {
        (excess as f64 / cfg.edge_falloff).min(1.0)
    } else {
        (excess as f64 / cfg.interior_falloff).min(cfg.interior_cap)
    };
    let de_green = (excess as f64 * strength).round() as i32;

    px[1] = clamp_channel(g - de_green);
    px[0] = clamp_channel(r + (de_green as f64 * cfg.red_lift).round() as i32);
    px[2] = clamp_channel(b + (de_green as f64 * cfg.blue_lift).round() as i32);

    if near && excess > cfg.erosion_excess {
        let erosion = ((excess - cfg.erosion_excess) as f64 * cfg.erosion_gain).round() as i32;
        px[3] = clamp_channel(a - erosion);
    }
    true
}

fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
