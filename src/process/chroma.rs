//! Chroma-key background removal.
//!
//! Only key-coloured regions connected to the sheet border are background.
//! A flood fill seeded from every key-coloured border pixel clears alpha
//! through 4-connected key-coloured neighbours; enclosed key-coloured
//! islands (a green eye, a leaf) keep their alpha.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Colour, ImageSurface, Rgba};

/// Decides whether a pixel is background key colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyColorClassifier {
    /// Green must be strictly greater than this.
    pub min_green: u8,
    /// Green must exceed both red and blue multiplied by this.
    pub dominance_ratio: f64,
    /// `green - max(red, blue)` must be strictly greater than this.
    pub min_excess: i32,
}

impl Default for KeyColorClassifier {
    fn default() -> Self {
        Self {
            min_green: 90,
            dominance_ratio: 1.2,
            min_excess: 28,
        }
    }
}

impl KeyColorClassifier {
    pub fn is_key(&self, px: Rgba) -> bool {
        let [r, g, b, _] = px;
        let green = g as f64;
        g > self.min_green
            && green > r as f64 * self.dominance_ratio
            && green > b as f64 * self.dominance_ratio
            && Colour::from_rgba(px).green_excess() > self.min_excess
    }
}

/// Background-removal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaKeyConfig {
    #[serde(flatten)]
    pub classifier: KeyColorClassifier,
    /// After spill erosion, pixels left with alpha at or below this are
    /// flattened to fully transparent.
    pub alpha_threshold: u8,
}

impl Default for ChromaKeyConfig {
    fn default() -> Self {
        Self {
            classifier: KeyColorClassifier::default(),
            alpha_threshold: 8,
        }
    }
}

/// Flattens border-connected key colour to transparent.
#[derive(Debug, Clone, Default)]
pub struct ChromaKeyRemover {
    config: ChromaKeyConfig,
}

impl ChromaKeyRemover {
    pub fn new(config: ChromaKeyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChromaKeyConfig {
        &self.config
    }

    /// Clear the alpha of every border-reachable key pixel.
    ///
    /// Only alpha is touched; RGB stays as it was. Returns the number of
    /// pixels cleared. A surface with no key colour on its border is left
    /// unchanged.
    pub fn remove<S: ImageSurface + ?Sized>(&self, surface: &mut S) -> usize {
        let (w, h) = surface.dimensions();
        if w == 0 || h == 0 {
            return 0;
        }

        let classifier = self.config.classifier;
        let idx = |x: u32, y: u32| y as usize * w as usize + x as usize;
        let mut visited = vec![false; w as usize * h as usize];
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

        let mut seed = |x: u32, y: u32, surface: &S, visited: &mut Vec<bool>| {
            let i = idx(x, y);
            if !visited[i] && classifier.is_key(surface.read(x, y)) {
                visited[i] = true;
                queue.push_back((x, y));
            }
        };

        for x in 0..w {
            seed(x, 0, surface, &mut visited);
            seed(x, h - 1, surface, &mut visited);
        }
        for y in 0..h {
            seed(0, y, surface, &mut visited);
            seed(w - 1, y, surface, &mut visited);
        }

        let mut cleared = 0;
        while let Some((x, y)) = queue.pop_front() {
            let mut px = surface.read(x, y);
            px[3] = 0;
            surface.write(x, y, px);
            cleared += 1;

            let neighbours = [
                (x.checked_add(1).filter(|&nx| nx < w), Some(y)),
                (x.checked_sub(1), Some(y)),
                (Some(x), y.checked_add(1).filter(|&ny| ny < h)),
                (Some(x), y.checked_sub(1)),
            ];
            for (nx, ny) in neighbours {
                let (Some(nx), Some(ny)) = (nx, ny) else {
                    continue;
                };
                let i = idx(nx, ny);
                if !visited[i] && classifier.is_key(surface.read(nx, ny)) {
                    visited[i] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        debug!(width = w, height = h, cleared, "removed key-colour background");
        cleared
    }

    /// Flatten nearly invisible pixels (alpha at or below the configured
    /// threshold, but not already zero) to alpha 0. Returns how many changed.
    pub fn flatten_faint<S: ImageSurface + ?Sized>(&self, surface: &mut S) -> usize {
        let threshold = self.config.alpha_threshold;
        let (w, h) = surface.dimensions();
        let mut flattened = 0;
        for y in 0..h {
            for x in 0..w {
                let mut px = surface.read(x, y);
                if px[3] != 0 && px[3] <= threshold {
                    px[3] = 0;
                    surface.write(x, y, px);
                    flattened += 1;
                }
            }
        }
        debug!(flattened, threshold, "flattened faint pixels");
        flattened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PixelSurface;

    const GREEN: Colour = Colour::KEY_GREEN;
    const RED: Colour = Colour::rgb(255, 0, 0);

    fn remover() -> ChromaKeyRemover {
        ChromaKeyRemover::default()
    }

    #[test]
    fn test_classifier_defaults() {
        let c = KeyColorClassifier::default();
        assert!(c.is_key([0, 255, 0, 255]));
        assert!(c.is_key([30, 140, 40, 255]));
        // green not above 90
        assert!(!c.is_key([0, 90, 0, 255]));
        // excess of exactly 28 is not enough
        assert!(!c.is_key([80, 108, 0, 255]));
        // not dominant over red by 1.2x
        assert!(!c.is_key([200, 235, 0, 255]));
        assert!(!c.is_key([255, 0, 0, 255]));
        assert!(!c.is_key([255, 255, 255, 255]));
    }

    #[test]
    fn test_removes_border_connected_background() {
        let mut s = PixelSurface::filled(10, 10, GREEN);
        s.fill_rect(crate::types::CellRect::new(3, 3, 4, 4), RED);

        let cleared = remover().remove(&mut s);

        assert_eq!(cleared, 100 - 16);
        for y in 0..10 {
            for x in 0..10 {
                let px = s.get(x, y).unwrap();
                if (3..7).contains(&x) && (3..7).contains(&y) {
                    assert_eq!(px, RED);
                } else {
                    assert_eq!(px.a, 0, "({}, {}) should be cleared", x, y);
                    // RGB is untouched
                    assert_eq!((px.r, px.g, px.b), (0, 255, 0));
                }
            }
        }
    }

    #[test]
    fn test_enclosed_island_survives() {
        // Red ring with a green pupil inside, on a green background.
        let mut s = PixelSurface::filled(9, 9, GREEN);
        s.fill_rect(crate::types::CellRect::new(2, 2, 5, 5), RED);
        s.put(4, 4, GREEN);

        remover().remove(&mut s);

        assert_eq!(s.get(4, 4), Some(GREEN));
        assert_eq!(s.get(0, 0).unwrap().a, 0);
        assert_eq!(s.get(1, 4).unwrap().a, 0);
    }

    #[test]
    fn test_no_border_key_leaves_surface_unchanged() {
        let mut s = PixelSurface::filled(6, 6, RED);
        s.put(3, 3, GREEN);
        let before = s.clone();

        assert_eq!(remover().remove(&mut s), 0);
        assert_eq!(s, before);
    }

    #[test]
    fn test_diagonal_is_not_connected() {
        // A key pixel touching the background only at a corner stays.
        let mut s = PixelSurface::filled(5, 5, RED);
        s.put(0, 0, GREEN);
        s.put(1, 1, GREEN);

        remover().remove(&mut s);

        assert_eq!(s.get(0, 0).unwrap().a, 0);
        assert_eq!(s.get(1, 1).unwrap().a, 255);
    }

    #[test]
    fn test_custom_classifier() {
        let mut s = PixelSurface::filled(4, 4, Colour::rgb(40, 100, 40));
        assert_eq!(remover().remove(&mut s.clone()), 16);

        let strict = ChromaKeyRemover::new(ChromaKeyConfig {
            classifier: KeyColorClassifier {
                min_green: 200,
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(strict.remove(&mut s), 0);
    }

    #[test]
    fn test_flatten_faint() {
        let mut s = PixelSurface::filled(2, 1, Colour::new(9, 9, 9, 8));
        s.put(1, 0, Colour::new(9, 9, 9, 9));
        assert_eq!(remover().flatten_faint(&mut s), 1);
        assert_eq!(s.get(0, 0), Some(Colour::new(9, 9, 9, 0)));
        assert_eq!(s.get(1, 0), Some(Colour::new(9, 9, 9, 9)));
    }

    #[test]
    fn test_empty_surface() {
        let mut s = PixelSurface::new(0, 0);
        assert_eq!(remover().remove(&mut s), 0);
    }

    #[test]
    fn test_works_on_rgba_image() {
        let mut img = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 255, 0, 255]));
        assert_eq!(remover().remove(&mut img), 9);
        assert!(img.pixels().all(|p| p[3] == 0));
    }
}
