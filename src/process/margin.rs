//! Sheet framing fixes applied before splitting.
//!
//! Generated sheets sometimes arrive with a solid key-colour border around
//! the grid, or with a size that does not divide evenly by the grid. Both
//! shift cell boundaries away from the poses.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::{CellRect, GridSpec, PixelSurface};

/// Trims outer rows and columns that are almost entirely solid key colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginTrim {
    /// A solid key pixel has at least this much green...
    pub min_green: u8,
    /// ...and at most this much red and blue.
    pub max_other: u8,
    /// A row or column is margin when this share of it is solid key.
    pub coverage: f64,
}

impl Default for MarginTrim {
    fn default() -> Self {
        Self {
            min_green: 200,
            max_other: 40,
            coverage: 0.98,
        }
    }
}

impl MarginTrim {
    fn is_solid_key(&self, px: &[u8]) -> bool {
        px[1] >= self.min_green && px[0] <= self.max_other && px[2] <= self.max_other
    }

    /// The rectangle left after dropping margin rows/columns, or `None` when
    /// there is nothing sensible to trim to.
    pub fn content_rect(&self, surface: &PixelSurface) -> Option<CellRect> {
        let (w, h) = surface.size();
        if w == 0 || h == 0 {
            return None;
        }

        let mut row_hits = vec![0u32; h as usize];
        let mut col_hits = vec![0u32; w as usize];
        for (i, px) in surface.as_raw().chunks_exact(4).enumerate() {
            if self.is_solid_key(px) {
                row_hits[i / w as usize] += 1;
                col_hits[i % w as usize] += 1;
            }
        }

        let keep = |hits: &[u32], len: u32| -> Option<(u32, u32)> {
            let is_content = |&n: &u32| (n as f64 / len as f64) < self.coverage;
            let first = hits.iter().position(is_content)?;
            let last = hits.iter().rposition(is_content)?;
            Some((first as u32, last as u32))
        };

        let (top, bottom) = keep(&row_hits, w)?;
        let (left, right) = keep(&col_hits, h)?;
        // Content one row or one column thick is treated as nothing to trim to.
        if bottom <= top || right <= left {
            return None;
        }
        Some(CellRect::new(left, top, right - left + 1, bottom - top + 1))
    }

    /// Crop away the key-colour margin. Returns the surface unchanged when it
    /// has no margin or is nothing but margin.
    pub fn trim(&self, surface: PixelSurface) -> Result<PixelSurface> {
        match self.content_rect(&surface) {
            Some(rect) if (rect.width, rect.height) != surface.size() => {
                debug!(from = ?surface.size(), to = %rect, "trimmed key-colour margin");
                surface.crop(rect)
            }
            _ => Ok(surface),
        }
    }
}

/// Centre-crop so width and height divide evenly by the grid.
///
/// Surfaces smaller than the grid in either direction are returned as-is.
pub fn fit_to_grid(surface: PixelSurface, grid: GridSpec) -> Result<PixelSurface> {
    let (w, h) = surface.size();
    let fit_w = w / grid.columns() * grid.columns();
    let fit_h = h / grid.rows() * grid.rows();
    if (fit_w, fit_h) == (w, h) || fit_w == 0 || fit_h == 0 {
        return Ok(surface);
    }
    let rect = CellRect::new((w - fit_w) / 2, (h - fit_h) / 2, fit_w, fit_h);
    debug!(grid = %grid, to = %rect, "fitted sheet to grid");
    surface.crop(rect)
}
