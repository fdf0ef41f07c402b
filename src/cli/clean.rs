//! Clean command: background removal and spill suppression on a whole sheet.

use std::path::PathBuf;

use clap::Args;

use crate::codec::{read_surface, write_png};
use crate::config::Settings;
use crate::error::Result;
use crate::output::{dimensions, display_path, plural, Printer};
use crate::process::Pipeline;

/// Remove the green background and suppress spill
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Sheet image on a green key background
    pub input: PathBuf,

    /// Output PNG (default: <input>-clean.png beside the input)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CleanArgs, settings: &Settings, printer: &Printer) -> Result<PathBuf> {
    super::ensure_input(&args.input)?;
    printer.status("Loading", &display_path(&args.input));
    let sheet = read_surface(&args.input)?;
    printer.verbose("Size", &dimensions(sheet.width(), sheet.height()));

    let pipeline = Pipeline::new(settings.pipeline.clone());
    let (clean, report) = pipeline.clean(sheet);
    printer.info(
        "Cleaned",
        &format!(
            "{} cleared, {} spill-corrected",
            plural(report.cleared, "pixel", "pixels"),
            report.spill_adjusted
        ),
    );

    let output = args.output.unwrap_or_else(|| {
        let stem = super::base_name(&args.input, "sheet");
        args.input.with_file_name(format!("{}-clean.png", stem))
    });
    write_png(&clean, &output)?;
    printer.status("Wrote", &display_path(&output));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StickerError;
    use crate::types::{CellRect, Colour, PixelSurface};
    use tempfile::tempdir;

    #[test]
    fn test_clean_writes_default_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("sheet.png");
        let mut sheet = PixelSurface::filled(20, 20, Colour::KEY_GREEN);
        sheet.fill_rect(CellRect::new(5, 5, 10, 10), Colour::rgb(200, 30, 30));
        write_png(&sheet, &input).unwrap();

        let args = CleanArgs {
            input: input.clone(),
            output: None,
        };
        let out = run(args, &Settings::default(), &Printer::new()).unwrap();

        assert_eq!(out, dir.path().join("sheet-clean.png"));
        let clean = read_surface(&out).unwrap();
        assert_eq!(clean.get(0, 0).unwrap().a, 0);
        assert_eq!(clean.get(10, 10), Some(Colour::rgb(200, 30, 30)));
    }

    #[test]
    fn test_clean_missing_input() {
        let dir = tempdir().unwrap();
        let args = CleanArgs {
            input: dir.path().join("missing.png"),
            output: None,
        };
        let err = run(args, &Settings::default(), &Printer::new()).unwrap_err();
        assert!(matches!(err, StickerError::Io { .. }));
    }
}
