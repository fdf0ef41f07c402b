//! Sticker outline ("die-cut" stroke).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Colour, PixelSurface};

/// Outline drawn around a sticker's visible silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeOptions {
    /// Outline thickness in pixels.
    pub width: u32,
    pub colour: Colour,
    /// Transparent border added first so the outline is never clipped.
    pub padding: u32,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            width: 4,
            colour: Colour::WHITE,
            padding: 12,
        }
    }
}

impl StrokeOptions {
    /// Pad the sticker and paint the stroke under its visible pixels.
    ///
    /// The result is `2 * padding` larger in each direction.
    pub fn apply(&self, sticker: &PixelSurface) -> PixelSurface {
        let pad = self.padding;
        let (w, h) = (sticker.width() + pad * 2, sticker.height() + pad * 2);
        let mut out = PixelSurface::new(w, h);
        out.blit(sticker, pad as i64, pad as i64);

        let (wu, hu) = (w as usize, h as usize);
        let visible: Vec<bool> = out.as_raw().chunks_exact(4).map(|px| px[3] > 0).collect();

        let r = self.width as i64;
        let disc: Vec<(i64, i64)> = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx * dx + dy * dy <= r * r)
            .collect();

        let mut stroke = vec![false; visible.len()];
        for y in 0..hu {
            for x in 0..wu {
                if !visible[y * wu + x] || !is_edge(&visible, wu, hu, x, y) {
                    continue;
                }
                for &(dx, dy) in &disc {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    if nx >= 0 && ny >= 0 && (nx as usize) < wu && (ny as usize) < hu {
                        stroke[ny as usize * wu + nx as usize] = true;
                    }
                }
            }
        }

        let paint = self.colour.to_rgba();
        let mut painted = 0;
        for (i, px) in out.as_raw_mut().chunks_exact_mut(4).enumerate() {
            if stroke[i] && !visible[i] {
                px.copy_from_slice(&paint);
                painted += 1;
            }
        }

        debug!(painted, width = self.width, "stroked sticker outline");
        out
    }
}

/// A visible pixel with at least one invisible (or off-surface) 8-neighbour.
fn is_edge(visible: &[bool], w: usize, h: usize, x: usize, y: usize) -> bool {
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                return true;
            }
            if !visible[ny as usize * w + nx as usize] {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellRect;

    const RED: Colour = Colour::rgb(255, 0, 0);

    #[test]
    fn test_stroke_pads_and_outlines() {
        let mut s = PixelSurface::new(10, 10);
        s.fill_rect(CellRect::new(4, 4, 2, 2), RED);

        let out = StrokeOptions::default().apply(&s);

        assert_eq!(out.size(), (34, 34));
        // content moved by the padding and left intact
        assert_eq!(out.get(16, 16), Some(RED));
        // 4px to the left of the content is stroke, 5px is not
        assert_eq!(out.get(12, 16), Some(Colour::WHITE));
        assert_eq!(out.get(11, 16), Some(Colour::TRANSPARENT));
        // corners are rounded
        assert_eq!(out.get(12, 12), Some(Colour::TRANSPARENT));
    }

    #[test]
    fn test_stroke_of_empty_sticker_is_empty() {
        let s = PixelSurface::new(5, 5);
        let out = StrokeOptions::default().apply(&s);
        assert!(out.is_fully_transparent());
    }

    #[test]
    fn test_custom_colour_and_no_padding() {
        let mut s = PixelSurface::new(5, 5);
        s.put(2, 2, RED);
        let opts = StrokeOptions {
            width: 1,
            colour: Colour::rgb(0, 0, 0),
            padding: 0,
        };
        let out = opts.apply(&s);
        assert_eq!(out.size(), (5, 5));
        assert_eq!(out.get(2, 1), Some(Colour::rgb(0, 0, 0)));
        assert_eq!(out.get(1, 1), Some(Colour::TRANSPARENT));
    }
}
