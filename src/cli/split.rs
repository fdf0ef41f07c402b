//! Split command.
//!
//! Cuts an already cleaned sheet into one re-centred PNG per grid cell.

use std::path::PathBuf;

use clap::Args;

use crate::codec::read_surface;
use crate::config::Settings;
use crate::error::Result;
use crate::output::{dimensions, display_path, Printer};
use crate::process::GridSplitter;
use crate::types::{GridSpec, ResampleFilter};

/// Cut a cleaned sheet into one PNG per grid cell
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Sheet image with a transparent background
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

    /// Pixels with alpha at or below this are ignored when cropping
    #[arg(long)]
    pub alpha_threshold: Option<u8>,

    /// Resampling filter used when fitting content to a cell
    #[arg(long, value_enum)]
    pub filter: Option<ResampleFilter>,
}

pub fn run(args: SplitArgs, settings: &Settings, printer: &Printer) -> Result<Vec<PathBuf>> {
    super::ensure_input(&args.input)?;
    let grid = args.grid.unwrap_or(settings.grid);

    let mut options = settings.pipeline.split;
    if let Some(threshold) = args.alpha_threshold {
        options.alpha_threshold = threshold;
    }
    if let Some(filter) = args.filter {
        options.filter = filter;
    }

    printer.status("Loading", &display_path(&args.input));
    let sheet = read_surface(&args.input)?;

    printer.status(
        "Splitting",
        &format!("{} into a {} grid", dimensions(sheet.width(), sheet.height()), grid),
    );
    let stickers = GridSplitter::new(options).split_grid(&sheet, grid)?;

    let base = args
        .name
        .unwrap_or_else(|| super::base_name(&args.input, "sticker"));
    let dir = args.output.unwrap_or_else(|| settings.output.clone());
    super::write_stickers(&stickers, &dir, &base, printer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write_png;
    use crate::types::{CellRect, Colour, PixelSurface};
    use tempfile::tempdir;

    fn args(input: PathBuf, output: PathBuf) -> SplitArgs {
        SplitArgs {
            input,
            grid: Some(GridSpec::new(2, 2).unwrap()),
            output: Some(output),
            name: Some("pack".to_string()),
            alpha_threshold: None,
            filter: Some(ResampleFilter::Nearest),
        }
    }

    #[test]
    fn test_split_writes_one_file_per_cell() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sheet.png");
        let mut sheet = PixelSurface::new(100, 100);
        sheet.fill_rect(CellRect::new(60, 10, 30, 30), Colour::rgb(0, 0, 255));
        write_png(&sheet, &input).unwrap();

        let out = dir.path().join("out");
        let written = run(args(input, out.clone()), &Settings::default(), &Printer::new()).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["pack-00.png", "pack-01.png", "pack-02.png", "pack-03.png"]);

        let top_right = read_surface(&out.join("pack-01.png")).unwrap();
        assert_eq!(top_right.size(), (50, 50));
        assert_eq!(top_right.get(25, 25), Some(Colour::rgb(0, 0, 255)));
        assert!(read_surface(&out.join("pack-00.png"))
            .unwrap()
            .is_fully_transparent());
    }

    #[test]
    fn test_split_uses_settings_grid() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sheet.png");
        write_png(&PixelSurface::new(30, 10), &input).unwrap();

        let settings = Settings::parse("grid: 3x1").unwrap();
        let mut a = args(input, dir.path().join("out"));
        a.grid = None;
        let written = run(a, &settings, &Printer::new()).unwrap();
        assert_eq!(written.len(), 3);
    }
}
