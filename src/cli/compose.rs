//! Compose command.
//!
//! Lays individual sticker PNGs out row-major on a grid sheet, optionally
//! writing TexturePacker JSON beside it.

use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::codec::{read_surface, write_png, write_sheet_json, SheetMeta};
use crate::config::Settings;
use crate::error::{Result, StickerError};
use crate::output::{dimensions, display_path, plural, Printer};
use crate::process::SheetComposer;
use crate::types::{GridSpec, StickerSheet};

/// Lay sticker PNGs out on a grid sheet
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Sticker PNGs or directories of them (directories are walked in path order)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Grid as COLUMNSxROWS (e.g. 4x4)
    #[arg(long, short)]
    pub grid: Option<GridSpec>,

    /// Output sheet PNG
    #[arg(long, short, default_value = "sheet.png")]
    pub output: PathBuf,

    /// Also write TexturePacker JSON metadata next to the sheet
    #[arg(long)]
    pub json: bool,
}

/// Expand directories into their PNG files, sorted by path. Explicit files
/// keep their argument order.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_png(e.path()))
                .map(|e| e.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            super::ensure_input(input)?;
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

pub fn run(args: ComposeArgs, settings: &Settings, printer: &Printer) -> Result<PathBuf> {
    let grid = args.grid.unwrap_or(settings.grid);
    let files = collect_inputs(&args.inputs)?;
    if files.is_empty() {
        return Err(StickerError::EmptyInput);
    }

    let mut stickers = Vec::with_capacity(files.len());
    for file in &files {
        printer.verbose("Loading", &display_path(file));
        stickers.push(read_surface(file)?);
    }
    printer.status(
        "Composing",
        &format!("{} on a {} grid", plural(stickers.len(), "sticker", "stickers"), grid),
    );

    if stickers.len() > grid.slots() {
        printer.warning(
            "Dropped",
            &format!(
                "{} beyond the {} grid's {} slots",
                plural(stickers.len() - grid.slots(), "sticker", "stickers"),
                grid,
                grid.slots()
            ),
        );
    }
    let sheet = StickerSheet::from_surfaces(grid, stickers);
    let (cell_w, cell_h) = sheet.cell_size().unwrap_or_default();
    if let Some(odd) = files
        .iter()
        .zip(&sheet.stickers)
        .find(|(_, s)| s.surface.size() != (cell_w, cell_h))
    {
        printer.warning(
            "Mismatch",
            &format!(
                "{} is {}, scaling to {} cells",
                display_path(odd.0),
                dimensions(odd.1.surface.width(), odd.1.surface.height()),
                dimensions(cell_w, cell_h)
            ),
        );
    }

    let composer = SheetComposer::new();
    let composed = composer.compose_sheet(&sheet)?;
    write_png(&composed, &args.output)?;
    printer.status(
        "Wrote",
        &format!(
            "{} ({})",
            display_path(&args.output),
            dimensions(composed.width(), composed.height())
        ),
    );

    if args.json {
        let names: Vec<String> = files
            .iter()
            .map(|f| super::base_name(f, "sticker"))
            .collect();
        let image = args
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = SheetMeta::from_placements(
            &composer.placements(sheet.len(), cell_w, cell_h, grid),
            &names,
            image,
            composed.size(),
        );
        let json_path = args.output.with_extension("json");
        write_sheet_json(&meta, &json_path)?;
        printer.status("Wrote", &display_path(&json_path));
    }

    Ok(args.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PixelSurface};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write_solid(path: &Path, c: Colour) {
        write_png(&PixelSurface::filled(10, 10, c), path).unwrap();
    }

    #[test]
    fn test_collect_inputs_sorts_directories() {
        let dir = tempdir().unwrap();
        let stickers = dir.path().join("stickers");
        fs::create_dir(&stickers).unwrap();
        write_solid(&stickers.join("b.png"), Colour::WHITE);
        write_solid(&stickers.join("a.PNG"), Colour::WHITE);
        fs::write(stickers.join("notes.txt"), "skip me").unwrap();
        let loose = dir.path().join("z.png");
        write_solid(&loose, Colour::WHITE);

        let files = collect_inputs(&[loose.clone(), stickers.clone()]).unwrap();
        assert_eq!(files, vec![loose, stickers.join("a.PNG"), stickers.join("b.png")]);
    }

    #[test]
    fn test_compose_writes_sheet_and_json() {
        let dir = tempdir().unwrap();
        let red = dir.path().join("red.png");
        let blue = dir.path().join("blue.png");
        write_solid(&red, Colour::rgb(255, 0, 0));
        write_solid(&blue, Colour::rgb(0, 0, 255));

        let output = dir.path().join("sheet.png");
        let args = ComposeArgs {
            inputs: vec![red, blue],
            grid: Some(GridSpec::new(2, 2).unwrap()),
            output: output.clone(),
            json: true,
        };
        run(args, &Settings::default(), &Printer::new()).unwrap();

        let sheet = read_surface(&output).unwrap();
        assert_eq!(sheet.size(), (20, 20));
        assert_eq!(sheet.get(5, 5), Some(Colour::rgb(255, 0, 0)));
        assert_eq!(sheet.get(15, 5), Some(Colour::rgb(0, 0, 255)));
        assert_eq!(sheet.get(5, 15), Some(Colour::TRANSPARENT));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("sheet.json")).unwrap())
                .unwrap();
        assert_eq!(json["frames"]["blue"]["frame"]["x"], 10);
        assert_eq!(json["meta"]["image"], "sheet.png");
    }

    #[test]
    fn test_compose_empty_directory() {
        let dir = tempdir().unwrap();
        let args = ComposeArgs {
            inputs: vec![dir.path().to_path_buf()],
            grid: None,
            output: dir.path().join("sheet.png"),
            json: false,
        };
        let err = run(args, &Settings::default(), &Printer::new()).unwrap_err();
        assert!(matches!(err, StickerError::EmptyInput));
    }
}
