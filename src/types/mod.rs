//! Core domain types for stickerkit.
//!
//! - `Colour` - RGBA colour values
//! - `PixelSurface` / `ImageSurface` - owned pixel buffers and pixel access
//! - `GridSpec` / `GridCell` - sheet grid geometry
//! - `StickerSurface` / `StickerSheet` - stickers and their sheet positions

mod colour;
mod geometry;
mod grid;
mod sticker;
mod surface;

pub use colour::{Colour, Rgba};
pub use geometry::{CellRect, OpaqueBounds};
pub use grid::{parse_dimensions, safe_inset, GridCell, GridSpec, DEFAULT_INSET_RATIO};
pub use sticker::{StickerSheet, StickerSurface};
pub use surface::{opaque_bounds_in, ImageSurface, PixelSurface, ResampleFilter};
