//! Fixed-size export canvases (e.g. messenger sticker formats).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};
use crate::types::{parse_dimensions, PixelSurface, ResampleFilter};

/// Target canvas every exported sticker is fitted into. Both sides are
/// always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExportSizeRepr", into = "ExportSizeRepr")]
pub struct ExportSize {
    width: u32,
    height: u32,
}

#[derive(Serialize, Deserialize)]
struct ExportSizeRepr {
    width: u32,
    height: u32,
}

impl TryFrom<ExportSizeRepr> for ExportSize {
    type Error = StickerError;

    fn try_from(repr: ExportSizeRepr) -> Result<Self> {
        Self::new(repr.width, repr.height)
    }
}

impl From<ExportSize> for ExportSizeRepr {
    fn from(size: ExportSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl ExportSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(StickerError::Parse {
                message: format!("Export size must be non-zero, got {}x{}", width, height),
                help: Some("Both width and height must be at least 1".to_string()),
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scale `sticker` to fit inside the canvas, keeping its aspect ratio,
    /// and centre it.
    pub fn fit(&self, sticker: &PixelSurface, filter: ResampleFilter) -> PixelSurface {
        let mut canvas = PixelSurface::new(self.width, self.height);
        let (w, h) = sticker.size();
        if w == 0 || h == 0 {
            return canvas;
        }

        let scale = (self.width as f64 / w as f64).min(self.height as f64 / h as f64);
        let new_w = ((w as f64 * scale) as u32).clamp(1, self.width);
        let new_h = ((h as f64 * scale) as u32).clamp(1, self.height);
        let scaled = sticker.resized(new_w, new_h, filter);

        canvas.blit(
            &scaled,
            ((self.width - new_w) / 2) as i64,
            ((self.height - new_h) / 2) as i64,
        );
        canvas
    }
}

impl fmt::Display for ExportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ExportSize {
    type Err = StickerError;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = parse_dimensions(s)?;
        Self::new(w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;

    #[test]
    fn test_parse() {
        assert_eq!(
            "370x320".parse::<ExportSize>().unwrap(),
            ExportSize::new(370, 320).unwrap()
        );
        assert!("0x320".parse::<ExportSize>().is_err());
    }

    #[test]
    fn test_fit_wide_sticker() {
        let s = PixelSurface::filled(200, 100, Colour::rgb(255, 0, 0));
        let out = ExportSize::new(370, 320)
            .unwrap()
            .fit(&s, ResampleFilter::Nearest);

        assert_eq!(out.size(), (370, 320));
        let b = out.opaque_bounds(0).unwrap();
        // 370 / 200 = 1.85 -> 370 x 185, centred vertically
        assert_eq!((b.min_x, b.width()), (0, 370));
        assert_eq!((b.min_y, b.height()), (67, 185));
    }

    #[test]
    fn test_deserialize_validates() {
        let size: ExportSize = serde_yaml::from_str("width: 370\nheight: 320").unwrap();
        assert_eq!((size.width(), size.height()), (370, 320));
        assert!(serde_yaml::from_str::<ExportSize>("width: 0\nheight: 320").is_err());
        assert!(serde_yaml::from_str::<ExportSize>("width: 370\nheight: 0").is_err());
    }

    #[test]
    fn test_fit_empty_sticker() {
        let out = ExportSize::new(10, 10)
            .unwrap()
            .fit(&PixelSurface::new(0, 0), ResampleFilter::Nearest);
        assert_eq!(out.size(), (10, 10));
        assert!(out.is_fully_transparent());
    }
}
