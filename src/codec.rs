//! Encoded image boundary.
//!
//! Surfaces enter the pipeline as encoded raster bytes and leave as PNG.
//! Composed sheets can also be described with TexturePacker-compatible
//! JSON Hash metadata for game engine interop.

use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use serde::Serialize;

use crate::error::{Result, StickerError};
use crate::process::Placement;
use crate::types::PixelSurface;

/// Decode any raster format `image` recognises into a surface.
pub fn decode_png(bytes: &[u8]) -> Result<PixelSurface> {
    let img = image::load_from_memory(bytes).map_err(|e| StickerError::Decode {
        message: e.to_string(),
        help: Some("Input must be a PNG (or another raster format with alpha)".to_string()),
    })?;
    Ok(PixelSurface::from_image(img.to_rgba8()))
}

/// Encode a surface as PNG bytes.
pub fn encode_png(surface: &PixelSurface) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    surface
        .as_image()
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| StickerError::surface(format!("Failed to encode PNG: {}", e)))?;
    Ok(out.into_inner())
}

/// Load and decode an image file.
pub fn read_surface(path: &Path) -> Result<PixelSurface> {
    let bytes = fs::read(path).map_err(|e| StickerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    })?;
    decode_png(&bytes).map_err(|e| match e {
        StickerError::Decode { message, help } => StickerError::Decode {
            message: format!("{}: {}", path.display(), message),
            help,
        },
        other => other,
    })
}

/// Write a surface to a PNG file.
pub fn write_png(surface: &PixelSurface, path: &Path) -> Result<()> {
    let bytes = encode_png(surface)?;
    fs::write(path, bytes).map_err(|e| StickerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })
}

/// A sticker's frame on a composed sheet.
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Composed sheet metadata.
#[derive(Debug, Clone)]
pub struct SheetMeta {
    pub frames: Vec<Frame>,
    pub image: String,
    pub size: (u32, u32),
}

impl SheetMeta {
    /// Build metadata from composer placements, naming each frame after the
    /// sticker it came from.
    pub fn from_placements(
        placements: &[Placement],
        names: &[String],
        image: impl Into<String>,
        size: (u32, u32),
    ) -> Self {
        let frames = placements
            .iter()
            .map(|p| Frame {
                name: names
                    .get(p.index)
                    .cloned()
                    .unwrap_or_else(|| format!("sticker-{:02}", p.index)),
                x: p.rect.x,
                y: p.rect.y,
                w: p.rect.width,
                h: p.rect.height,
            })
            .collect();
        Self {
            frames,
            image: image.into(),
            size,
        }
    }
}

/// Write sheet metadata as TexturePacker-compatible JSON Hash format.
pub fn write_sheet_json(meta: &SheetMeta, path: &Path) -> Result<()> {
    let json = sheet_json(meta)?;
    fs::write(path, json).map_err(|e| StickerError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write sheet metadata: {}", e),
    })
}

/// Render sheet metadata as pretty-printed JSON.
pub fn sheet_json(meta: &SheetMeta) -> Result<String> {
    serde_json::to_string_pretty(&TexturePackerJson::from_meta(meta)).map_err(|e| {
        StickerError::Config {
            message: format!("Failed to serialize sheet metadata: {}", e),
            help: None,
        }
    })
}

// --- TexturePacker JSON serialization types ---

#[derive(Serialize)]
struct TexturePackerJson {
    frames: BTreeMap<String, TPFrame>,
    meta: TPMeta,
}

#[derive(Serialize)]
struct TPFrame {
    frame: TPRect,
    rotated: bool,
    trimmed: bool,
    #[serde(rename = "spriteSourceSize")]
    sprite_source_size: TPRect,
    #[serde(rename = "sourceSize")]
    source_size: TPSize,
}

#[derive(Serialize)]
struct TPRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPSize {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPMeta {
    app: String,
    version: String,
    image: String,
    size: TPSize,
    scale: String,
}

impl TexturePackerJson {
    fn from_meta(meta: &SheetMeta) -> Self {
        let frames = meta
            .frames
            .iter()
            .map(|f| {
                let frame = TPFrame {
                    frame: TPRect {
                        x: f.x,
                        y: f.y,
                        w: f.w,
                        h: f.h,
                    },
                    rotated: false,
                    trimmed: false,
                    sprite_source_size: TPRect {
                        x: 0,
                        y: 0,
                        w: f.w,
                        h: f.h,
                    },
                    source_size: TPSize { w: f.w, h: f.h },
                };
                (f.name.clone(), frame)
            })
            .collect();

        TexturePackerJson {
            frames,
            meta: TPMeta {
                app: "stickerkit".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                image: meta.image.clone(),
                size: TPSize {
                    w: meta.size.0,
                    h: meta.size.1,
                },
                scale: "1".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellRect, Colour};
    use tempfile::tempdir;

    #[test]
    fn test_encode_decode_preserves_alpha() {
        let mut s = PixelSurface::new(3, 2);
        s.put(0, 0, Colour::new(255, 0, 0, 128));
        s.put(2, 1, Colour::rgb(0, 0, 255));

        let bytes = encode_png(&s).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let back = decode_png(&bytes).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_png(b"definitely not an image").unwrap_err();
        assert!(matches!(err, StickerError::Decode { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_surface(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, StickerError::Io { .. }));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.png");
        let s = PixelSurface::filled(4, 4, Colour::KEY_GREEN);
        write_png(&s, &path).unwrap();
        assert_eq!(read_surface(&path).unwrap(), s);
    }

    #[test]
    fn test_sheet_json() {
        let placements = [
            Placement {
                index: 0,
                rect: CellRect::new(0, 0, 100, 100),
            },
            Placement {
                index: 1,
                rect: CellRect::new(100, 0, 100, 100),
            },
        ];
        let names = vec!["wave".to_string()];
        let meta = SheetMeta::from_placements(&placements, &names, "sheet.png", (200, 100));

        let parsed: serde_json::Value = serde_json::from_str(&sheet_json(&meta).unwrap()).unwrap();

        assert_eq!(parsed["frames"]["wave"]["frame"]["x"], 0);
        assert_eq!(parsed["frames"]["sticker-01"]["frame"]["x"], 100);
        assert_eq!(parsed["frames"]["sticker-01"]["sourceSize"]["w"], 100);
        assert_eq!(parsed["frames"]["wave"]["rotated"], false);
        assert_eq!(parsed["meta"]["app"], "stickerkit");
        assert_eq!(parsed["meta"]["size"]["w"], 200);
    }

    #[test]
    fn test_write_sheet_json() {
        let meta = SheetMeta {
            frames: vec![Frame {
                name: "hello".to_string(),
                x: 0,
                y: 0,
                w: 8,
                h: 8,
            }],
            image: "sheet.png".to_string(),
            size: (8, 8),
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        write_sheet_json(&meta, &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        insta::assert_json_snapshot!(parsed["frames"], @r#"
        {
          "hello": {
            "frame": {
              "h": 8,
              "w": 8,
              "x": 0,
              "y": 0
            },
            "rotated": false,
            "sourceSize": {
              "h": 8,
              "w": 8
            },
            "spriteSourceSize": {
              "h": 8,
              "w": 8,
              "x": 0,
              "y": 0
            },
            "trimmed": false
          }
        }
        "#);
    }
}
