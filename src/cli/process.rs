//! Process command: the whole pipeline from a raw green-key sheet to
//! finished sticker PNGs.

use std::path::PathBuf;

use clap::Args;

use crate::codec::read_surface;
use crate::config::Settings;
use crate::error::Result;
use crate::output::{dimensions, display_path, plural, Printer};
use crate::process::{
    Despeckle, ExportSize, GreenCutoff, MarginTrim, Pipeline, PipelineConfig, StrokeOptions,
};
use crate::types::{Colour, GridSpec, ResampleFilter};

/// Run the full pipeline on a raw sheet
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Sheet image on a green key background
    pub input: PathBuf,

    /// Grid as COLUMNSxROWS (e.g. 4x4)
    #[arg(long, short)]
    pub grid: Option<GridSpec>,

    /// Output directory for sticker PNGs
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Base name for sticker files (default: input filename stem)
    #[arg(long)]
    pub name: Option<String>,

    /// Crop solid green margins before splitting
    #[arg(long)]
    pub trim_margin: bool,

    /// Centre-crop the sheet to an exact multiple of the grid
    #[arg(long)]
    pub fit_grid: bool,

    /// Clear bright green pixels left after background removal
    #[arg(long)]
    pub green_cutoff: bool,

    /// Drop small stray opaque specks from each sticker
    #[arg(long)]
    pub despeckle: bool,

    /// Outline each sticker (default colour #FFFFFF)
    #[arg(long, value_name = "COLOUR", num_args = 0..=1, default_missing_value = "#FFFFFF")]
    pub stroke: Option<Colour>,

    /// Outline thickness in pixels
    #[arg(long, requires = "stroke")]
    pub stroke_width: Option<u32>,

    /// Fit every sticker into a fixed canvas, e.g. 370x320
    #[arg(long, value_name = "WxH")]
    pub export_size: Option<ExportSize>,

    /// Resampling filter
    #[arg(long, value_enum)]
    pub filter: Option<ResampleFilter>,
}

impl ProcessArgs {
    /// Settings-file pipeline with this invocation's flags applied on top.
    pub fn pipeline_config(&self, base: &PipelineConfig) -> PipelineConfig {
        let mut config = base.clone();
        if self.trim_margin && config.trim_margin.is_none() {
            config.trim_margin = Some(MarginTrim::default());
        }
        if self.fit_grid {
            config.fit_to_grid = true;
        }
        if self.green_cutoff && config.green_cutoff.is_none() {
            config.green_cutoff = Some(GreenCutoff::default());
        }
        if self.despeckle && config.despeckle.is_none() {
            config.despeckle = Some(Despeckle::default());
        }
        if let Some(colour) = self.stroke {
            let stroke = config.stroke.get_or_insert_with(StrokeOptions::default);
            stroke.colour = colour;
        }
        if let (Some(width), Some(stroke)) = (self.stroke_width, config.stroke.as_mut()) {
            stroke.width = width;
        }
        if let Some(size) = self.export_size {
            config.export_size = Some(size);
        }
        if let Some(filter) = self.filter {
            config.split.filter = filter;
        }
        config
    }
}

pub fn run(args: ProcessArgs, settings: &Settings, printer: &Printer) -> Result<Vec<PathBuf>> {
    super::ensure_input(&args.input)?;
    let grid = args.grid.unwrap_or(settings.grid);
    let pipeline = Pipeline::new(args.pipeline_config(&settings.pipeline));

    printer.status("Loading", &display_path(&args.input));
    let raw = read_surface(&args.input)?;

    let sheet = pipeline.prepare(raw, grid)?;
    printer.verbose("Framed", &dimensions(sheet.width(), sheet.height()));

    let (sheet, report) = pipeline.clean(sheet);
    printer.info(
        "Cleaned",
        &format!(
            "{} cleared, {} spill-corrected",
            plural(report.cleared, "pixel", "pixels"),
            report.spill_adjusted
        ),
    );

    printer.status("Splitting", &format!("{} grid", grid));
    let stickers = pipeline.split(&sheet, grid)?;

    let base = args
        .name
        .unwrap_or_else(|| super::base_name(&args.input, "sticker"));
    let dir = args.output.unwrap_or_else(|| settings.output.clone());
    super::write_stickers(&stickers, &dir, &base, printer)
}
