//! stickerkit - Chroma-key sticker sheet cutter
//!
//! Turns a sheet of stickers drawn on a flat green key background into
//! individual transparent stickers, and composes stickers back into a
//! sheet.
//!
//! ```no_run
//! use stickerkit::{decode_png, GridSpec, Pipeline};
//!
//! # fn main() -> stickerkit::Result<()> {
//! let sheet = decode_png(&std::fs::read("sheet.png")?)?;
//! let stickers = Pipeline::default().process(sheet, GridSpec::new(4, 4)?)?;
//! assert_eq!(stickers.len(), 16);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod output;
pub mod process;
pub mod types;

pub use codec::{decode_png, encode_png, read_surface, write_png, write_sheet_json, Frame, SheetMeta};
pub use config::Settings;
pub use error::{Result, StickerError};
pub use process::{
    ChromaKeyConfig, ChromaKeyRemover, CleanReport, Despeckle, ExportSize, GreenCutoff,
    GridSplitter, KeyColorClassifier, MarginTrim, Pipeline, PipelineConfig, Placement,
    SheetComposer, SpillConfig, SpillSuppressor, SplitOptions, StrokeOptions,
};
pub use types::{
    CellRect, Colour, GridCell, GridSpec, ImageSurface, OpaqueBounds, PixelSurface,
    ResampleFilter, StickerSheet, StickerSurface,
};
