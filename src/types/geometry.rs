//! Rectangles used to address regions of a surface.

use std::fmt;

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Shrink by `amount` on all four sides, keeping at least one pixel
    /// in each direction.
    pub fn inset(&self, amount: u32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width.saturating_sub(amount * 2).max(1),
            height: self.height.saturating_sub(amount * 2).max(1),
        }
    }

    /// Clip to a `width` x `height` surface. May return an empty rect.
    pub fn clip_to(&self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.right().min(width) - x,
            height: self.bottom().min(height) - y,
        }
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Tightest box (inclusive corners) around the pixels whose alpha exceeds
/// a threshold.
///
/// Only ever constructed with `max_x >= min_x` and `max_y >= min_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpaqueBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl OpaqueBounds {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn to_rect(&self) -> CellRect {
        CellRect::new(self.min_x, self.min_y, self.width(), self.height())
    }
}

/// Running min/max accumulator for [`OpaqueBounds`].
#[derive(Debug, Default)]
pub(crate) struct BoundsAccumulator {
    bounds: Option<OpaqueBounds>,
}

impl BoundsAccumulator {
    pub(crate) fn include(&mut self, x: u32, y: u32) {
        self.bounds = Some(match self.bounds {
            None => OpaqueBounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => OpaqueBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }

    pub(crate) fn finish(self) -> Option<OpaqueBounds> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_keeps_one_pixel() {
        let r = CellRect::new(10, 10, 3, 100);
        let inset = r.inset(2);
        assert_eq!(inset, CellRect::new(12, 12, 1, 96));
    }

    #[test]
    fn test_clip_to_surface() {
        let r = CellRect::new(8, 8, 4, 4);
        assert_eq!(r.clip_to(10, 20), CellRect::new(8, 8, 2, 4));
        assert!(CellRect::new(12, 0, 4, 4).clip_to(10, 10).is_empty());
    }

    #[test]
    fn test_bounds_accumulator() {
        let mut acc = BoundsAccumulator::default();
        acc.include(5, 2);
        acc.include(1, 7);
        acc.include(3, 3);
        let b = acc.finish().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (1, 2, 5, 7));
        assert_eq!((b.width(), b.height()), (5, 6));
        assert_eq!(b.to_rect(), CellRect::new(1, 2, 5, 6));
    }

    #[test]
    fn test_bounds_accumulator_empty() {
        assert!(BoundsAccumulator::default().finish().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellRect::new(1, 2, 30, 40).to_string(), "30x40+1+2");
    }
}
