//! End-to-end sheet processing.
//!
//! decode -> [trim margin] -> [fit to grid] -> remove background ->
//! [green cutoff] -> suppress spill -> split -> [despeckle] -> [stroke] -> [export size]

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::{GridSpec, PixelSurface, StickerSurface};

use super::chroma::{ChromaKeyConfig, ChromaKeyRemover};
use super::despeckle::Despeckle;
use super::export::ExportSize;
use super::margin::{fit_to_grid, MarginTrim};
use super::spill::{GreenCutoff, SpillConfig, SpillSuppressor};
use super::split::{GridSplitter, SplitOptions};
use super::stroke::StrokeOptions;

/// Every tunable of the pipeline. Optional stages are off when `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub key: ChromaKeyConfig,
    pub spill: SpillConfig,
    pub split: SplitOptions,
    pub trim_margin: Option<MarginTrim>,
    pub fit_to_grid: bool,
    pub green_cutoff: Option<GreenCutoff>,
    pub despeckle: Option<Despeckle>,
    pub stroke: Option<StrokeOptions>,
    pub export_size: Option<ExportSize>,
}

/// Counters from a [`Pipeline::clean`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub cleared: usize,
    pub spill_adjusted: usize,
    pub flattened: usize,
    pub green_cut: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    remover: ChromaKeyRemover,
    suppressor: SpillSuppressor,
    splitter: GridSplitter,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            remover: ChromaKeyRemover::new(config.key),
            suppressor: SpillSuppressor::new(config.spill),
            splitter: GridSplitter::new(config.split),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Remove the key background, apply the optional green cutoff and
    /// suppress spill.
    pub fn clean(&self, mut sheet: PixelSurface) -> (PixelSurface, CleanReport) {
        let cleared = self.remover.remove(&mut sheet);
        let green_cut = self
            .config
            .green_cutoff
            .map_or(0, |cutoff| cutoff.apply(&mut sheet));
        let spill_adjusted = self.suppressor.suppress(&mut sheet);
        let flattened = self.remover.flatten_faint(&mut sheet);
        let report = CleanReport {
            cleared,
            spill_adjusted,
            flattened,
            green_cut,
        };
        debug!(?report, "cleaned sheet");
        (sheet, report)
    }

    /// Apply the optional framing fixes to a raw sheet.
    pub fn prepare(&self, mut sheet: PixelSurface, grid: GridSpec) -> Result<PixelSurface> {
        if let Some(trim) = &self.config.trim_margin {
            sheet = trim.trim(sheet)?;
        }
        if self.config.fit_to_grid {
            sheet = fit_to_grid(sheet, grid)?;
        }
        Ok(sheet)
    }

    /// Split an already cleaned sheet and finish every sticker.
    pub fn split(&self, sheet: &PixelSurface, grid: GridSpec) -> Result<Vec<StickerSurface>> {
        let stickers = self.splitter.split_grid(sheet, grid)?;
        Ok(stickers.into_par_iter().map(|s| self.finish(s)).collect())
    }

    /// Run the whole pipeline on a raw key-colour sheet.
    pub fn process(&self, sheet: PixelSurface, grid: GridSpec) -> Result<Vec<StickerSurface>> {
        let sheet = self.prepare(sheet, grid)?;
        let (sheet, _) = self.clean(sheet);
        self.split(&sheet, grid)
    }

    /// Per-sticker finishing stages.
    pub fn finish(&self, mut sticker: StickerSurface) -> StickerSurface {
        if let Some(despeckle) = &self.config.despeckle {
            despeckle.apply(&mut sticker.surface);
        }
        if let Some(stroke) = &self.config.stroke {
            sticker.surface = stroke.apply(&sticker.surface);
        }
        if let Some(size) = &self.config.export_size {
            sticker.surface = size.fit(&sticker.surface, self.config.split.filter);
        }
        sticker
    }
}
