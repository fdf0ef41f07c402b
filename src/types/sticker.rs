//! Stickers cut from, or destined for, a sheet.

use super::grid::GridSpec;
use super::surface::PixelSurface;

/// A sticker surface tagged with its row-major sheet position.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerSurface {
    pub index: usize,
    pub row: u32,
    pub col: u32,
    pub surface: PixelSurface,
}

impl StickerSurface {
    pub fn new(index: usize, row: u32, col: u32, surface: PixelSurface) -> Self {
        Self {
            index,
            row,
            col,
            surface,
        }
    }

    /// Tag a loose surface with its position in `grid`.
    pub fn at(grid: &GridSpec, index: usize, surface: PixelSurface) -> Self {
        let (row, col) = grid.position_of(index);
        Self::new(index, row, col, surface)
    }

    pub fn into_surface(self) -> PixelSurface {
        self.surface
    }
}

impl AsRef<PixelSurface> for StickerSurface {
    fn as_ref(&self) -> &PixelSurface {
        &self.surface
    }
}

/// An ordered set of stickers with the grid they belong on.
///
/// All stickers are expected to share the first sticker's size.
#[derive(Debug, Clone)]
pub struct StickerSheet {
    pub grid: GridSpec,
    pub stickers: Vec<StickerSurface>,
}

impl StickerSheet {
    pub fn new(grid: GridSpec, stickers: Vec<StickerSurface>) -> Self {
        Self { grid, stickers }
    }

    /// Build a sheet from surfaces in row-major order.
    pub fn from_surfaces(grid: GridSpec, surfaces: Vec<PixelSurface>) -> Self {
        let stickers = surfaces
            .into_iter()
            .enumerate()
            .map(|(i, s)| StickerSurface::at(&grid, i, s))
            .collect();
        Self { grid, stickers }
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Size of the first sticker, which sets the cell size for all.
    pub fn cell_size(&self) -> Option<(u32, u32)> {
        self.stickers.first().map(|s| s.surface.size())
    }
}
