//! Sheet composer - lays stickers back out on a grid canvas.

use tracing::{debug, trace};

use crate::error::{Result, StickerError};
use crate::types::{CellRect, GridSpec, PixelSurface, ResampleFilter, StickerSheet};

/// A sticker's slot on a composed sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index into the input sticker list.
    pub index: usize,
    pub rect: CellRect,
}

/// Composes stickers into a single `columns x rows` sheet.
///
/// The first sticker's size is the cell size for every slot; stickers of
/// other sizes are scaled into their cell with the default filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetComposer;

impl SheetComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose stickers row-major onto a transparent canvas.
    ///
    /// Fails with `EmptyInput` for an empty list, then with `InvalidGrid`
    /// for a zero dimension. Stickers beyond `columns * rows` are dropped,
    /// and a sticker whose size differs from the first is scaled to fit
    /// its slot so it never paints over a neighbour.
    pub fn compose<S: AsRef<PixelSurface>>(
        &self,
        stickers: &[S],
        columns: u32,
        rows: u32,
    ) -> Result<PixelSurface> {
        if stickers.is_empty() {
            return Err(StickerError::EmptyInput);
        }
        let grid = GridSpec::new(columns, rows)?;
        self.compose_grid(stickers, grid)
    }

    /// Compose with an already validated grid.
    pub fn compose_grid<S: AsRef<PixelSurface>>(
        &self,
        stickers: &[S],
        grid: GridSpec,
    ) -> Result<PixelSurface> {
        let Some(first) = stickers.first() else {
            return Err(StickerError::EmptyInput);
        };
        let (cell_w, cell_h) = first.as_ref().size();

        let mut canvas = PixelSurface::new(cell_w * grid.columns(), cell_h * grid.rows());
        let placements = self.placements(stickers.len(), cell_w, cell_h, grid);
        for p in &placements {
            let sticker = stickers[p.index].as_ref();
            let (x, y) = (p.rect.x as i64, p.rect.y as i64);
            if sticker.size() == (cell_w, cell_h) {
                canvas.blit(sticker, x, y);
            } else {
                trace!(index = p.index, size = ?sticker.size(), "scaling sticker into cell");
                canvas.blit(&sticker.resized(cell_w, cell_h, ResampleFilter::default()), x, y);
            }
        }

        debug!(
            grid = %grid,
            placed = placements.len(),
            dropped = stickers.len() - placements.len(),
            "composed sheet"
        );
        Ok(canvas)
    }

    /// Compose a sheet's stickers on its own grid.
    pub fn compose_sheet(&self, sheet: &StickerSheet) -> Result<PixelSurface> {
        self.compose_grid(&sheet.stickers, sheet.grid)
    }

    /// Slots for the first `count` stickers, truncated to the grid.
    pub fn placements(&self, count: usize, cell_w: u32, cell_h: u32, grid: GridSpec) -> Vec<Placement> {
        (0..count.min(grid.slots()))
            .map(|index| {
                let (row, col) = grid.position_of(index);
                Placement {
                    index,
                    rect: CellRect::new(col * cell_w, row * cell_h, cell_w, cell_h),
                }
            })
            .collect()
    }
}
