//! Pixel pipeline for sticker sheets.
//!
//! The core stages run in this order on one owned surface: chroma-key
//! removal, spill suppression, grid splitting. Composition is the inverse
//! of splitting and runs on its own.

mod chroma;
mod compose;
mod despeckle;
mod export;
mod margin;
mod pipeline;
mod spill;
mod split;
mod stroke;

pub use chroma::{ChromaKeyConfig, ChromaKeyRemover, KeyColorClassifier};
pub use compose::{Placement, SheetComposer};
pub use despeckle::Despeckle;
pub use export::ExportSize;
pub use margin::{fit_to_grid, MarginTrim};
pub use pipeline::{CleanReport, Pipeline, PipelineConfig};
pub use spill::{GreenCutoff, SpillConfig, SpillSuppressor};
pub use split::{GridSplitter, SplitOptions};
pub use stroke::StrokeOptions;
