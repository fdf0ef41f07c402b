//! Removal of small detached fragments from a sticker.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::PixelSurface;

/// Fragments (8-connected groups of visible pixels) smaller than
/// `max(min_area, width * height * area_ratio)` are made transparent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Despeckle {
    pub min_area: usize,
    pub area_ratio: f64,
}

impl Default for Despeckle {
    fn default() -> Self {
        Self {
            min_area: 50,
            area_ratio: 0.002,
        }
    }
}

impl Despeckle {
    /// Smallest fragment kept on a surface of the given size.
    pub fn threshold(&self, width: u32, height: u32) -> usize {
        let scaled = (width as f64 * height as f64 * self.area_ratio) as usize;
        self.min_area.max(scaled)
    }

    /// Clear small fragments. Returns the number of pixels cleared.
    pub fn apply(&self, surface: &mut PixelSurface) -> usize {
        let (w, h) = surface.size();
        let (w, h) = (w as usize, h as usize);
        let min_area = self.threshold(w as u32, h as u32);

        let visible: Vec<bool> = surface.as_raw().chunks_exact(4).map(|px| px[3] > 0).collect();
        let mut labelled = vec![false; visible.len()];
        let mut queue = VecDeque::new();
        let mut component = Vec::new();
        let mut doomed = Vec::new();

        for start in 0..visible.len() {
            if !visible[start] || labelled[start] {
                continue;
            }

            component.clear();
            labelled[start] = true;
            queue.push_back(start);
            while let Some(i) = queue.pop_front() {
                component.push(i);
                let (x, y) = (i % w, i / w);
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                            continue;
                        }
                        let n = ny as usize * w + nx as usize;
                        if visible[n] && !labelled[n] {
                            labelled[n] = true;
                            queue.push_back(n);
                        }
                    }
                }
            }

            if component.len() < min_area {
                doomed.extend_from_slice(&component);
            }
        }

        let raw = surface.as_raw_mut();
        for &i in &doomed {
            raw[i * 4 + 3] = 0;
        }

        debug!(cleared = doomed.len(), min_area, "despeckled sticker");
        doomed.len()
    }
}
