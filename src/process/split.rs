//! Grid splitter.
//!
//! Cuts a sheet into `columns x rows` cells, crops each cell to its opaque
//! content and re-centres that content, uniformly padded, on a transparent
//! surface the size of the original cell.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::Result;
use crate::types::{
    opaque_bounds_in, CellRect, GridCell, GridSpec, PixelSurface, ResampleFilter,
    StickerSurface, DEFAULT_INSET_RATIO,
};

/// Options for [`GridSplitter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// Pixels with alpha at or below this do not count as content.
    pub alpha_threshold: u8,
    /// Inward inset per side, as a share of the smaller cell side.
    pub inset_ratio: f64,
    /// Padding around the fitted content, as a share of the smaller cell side.
    pub padding_ratio: f64,
    /// Padding never drops below this many pixels.
    pub min_padding: u32,
    pub filter: ResampleFilter,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            alpha_threshold: 8,
            inset_ratio: DEFAULT_INSET_RATIO,
            padding_ratio: 0.06,
            min_padding: 6,
            filter: ResampleFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GridSplitter {
    options: SplitOptions,
}

impl GridSplitter {
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Split a sheet into `columns * rows` stickers in row-major order.
    ///
    /// Fails with `InvalidGrid` when either dimension is zero.
    pub fn split(&self, sheet: &PixelSurface, columns: u32, rows: u32) -> Result<Vec<StickerSurface>> {
        self.split_grid(sheet, GridSpec::new(columns, rows)?)
    }

    /// Split with an already validated grid.
    pub fn split_grid(&self, sheet: &PixelSurface, grid: GridSpec) -> Result<Vec<StickerSurface>> {
        let cells = grid.layout(sheet.width(), sheet.height(), self.options.inset_ratio);
        debug!(
            grid = %grid,
            width = sheet.width(),
            height = sheet.height(),
            "splitting sheet"
        );

        cells
            .par_iter()
            .map(|cell| {
                let surface = self.extract(sheet, cell)?;
                Ok(StickerSurface::new(cell.index, cell.row, cell.col, surface))
            })
            .collect()
    }

    /// Produce the sticker surface for one cell.
    pub fn extract(&self, sheet: &PixelSurface, cell: &GridCell) -> Result<PixelSurface> {
        let (cell_w, cell_h) = (cell.rect.width, cell.rect.height);
        if cell.rect.is_empty() || cell.source.is_empty() {
            return Ok(PixelSurface::new(cell_w, cell_h));
        }

        let Some(bounds) = opaque_bounds_in(sheet, cell.source, self.options.alpha_threshold)
        else {
            trace!(index = cell.index, "no content in cell, scaling whole cell");
            return Ok(sheet
                .crop(cell.source)?
                .resized(cell_w, cell_h, self.options.filter));
        };

        let padding = target_padding(cell_w, cell_h, &self.options);
        let available_w = cell_w.saturating_sub(padding * 2).max(1) as f64;
        let available_h = cell_h.saturating_sub(padding * 2).max(1) as f64;
        let fit = (available_w / bounds.width() as f64).min(available_h / bounds.height() as f64);

        let draw_w = bounds.width() as f64 * fit;
        let draw_h = bounds.height() as f64 * fit;
        let draw_x = (cell_w as f64 - draw_w) / 2.0;
        let draw_y = (cell_h as f64 - draw_h) / 2.0;

        trace!(
            index = cell.index,
            bounds = %bounds.to_rect(),
            fit,
            "centring cell content"
        );

        let content_rect = CellRect::new(
            cell.source.x + bounds.min_x,
            cell.source.y + bounds.min_y,
            bounds.width(),
            bounds.height(),
        );
        let content = sheet.crop(content_rect)?.resized(
            (draw_w.round() as u32).max(1),
            (draw_h.round() as u32).max(1),
            self.options.filter,
        );

        let mut sticker = PixelSurface::new(cell_w, cell_h);
        sticker.blit(&content, draw_x.round() as i64, draw_y.round() as i64);
        Ok(sticker)
    }
}

/// Padding kept between fitted content and the cell edge.
fn target_padding(cell_w: u32, cell_h: u32, options: &SplitOptions) -> u32 {
    let min_side = cell_w.min(cell_h) as f64;
    ((min_side * options.padding_ratio).round() as u32).max(options.min_padding)
}
