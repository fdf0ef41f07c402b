pub mod clean;
pub mod completions;
pub mod compose;
pub mod process;
pub mod split;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::codec::write_png;
use crate::error::{Result, StickerError};
use crate::output::{display_path, plural, Printer};
use crate::types::StickerSurface;

/// stickerkit - Chroma-key sticker sheet cutter
#[derive(Parser, Debug)]
#[command(name = "stickerkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: stickerkit.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show per-stage detail and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove the green background and suppress spill
    Clean(clean::CleanArgs),

    /// Cut a cleaned sheet into one PNG per grid cell
    Split(split::SplitArgs),

    /// Lay sticker PNGs out on a grid sheet
    Compose(compose::ComposeArgs),

    /// Run the full pipeline on a raw sheet
    Process(process::ProcessArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// `<base>-<index>.png`, index zero-padded to the width of the last index
/// (at least two digits).
pub fn sticker_file_name(base: &str, index: usize, count: usize) -> String {
    let digits = count.saturating_sub(1).to_string().len().max(2);
    format!("{}-{:0width$}.png", base, index, width = digits)
}

/// Input file stem, used as the default base name.
fn base_name(input: &Path, fallback: &str) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(fallback)
        .to_string()
}

fn ensure_input(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(StickerError::Io {
            path: path.to_path_buf(),
            message: format!("File not found: {}", display_path(path)),
        })
    }
}

/// Write every sticker into `dir`, returning the written paths in index order.
fn write_stickers(
    stickers: &[StickerSurface],
    dir: &Path,
    base: &str,
    printer: &Printer,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| StickerError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let mut written = Vec::with_capacity(stickers.len());
    for sticker in stickers {
        let path = dir.join(sticker_file_name(base, sticker.index, stickers.len()));
        write_png(&sticker.surface, &path)?;
        printer.verbose(
            "Wrote",
            &format!(
                "{} (row {}, col {})",
                display_path(&path),
                sticker.row,
                sticker.col
            ),
        );
        written.push(path);
    }

    let blank = stickers
        .iter()
        .filter(|s| s.surface.is_fully_transparent())
        .count();
    let summary = plural(written.len(), "sticker", "stickers");
    if blank > 0 {
        printer.warning(
            "Blank",
            &format!("{} of {} have no visible pixels", blank, summary),
        );
    }
    printer.status(
        "Finished",
        &format!("{} in {}", summary, display_path(dir)),
    );
    Ok(written)
}
