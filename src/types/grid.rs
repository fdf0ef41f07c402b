//! Grid geometry for sticker sheets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

use super::geometry::CellRect;

/// Fraction of the smaller cell side trimmed from every edge before sampling.
pub const DEFAULT_INSET_RATIO: f64 = 0.02;

/// Columns x rows of a sticker sheet. Both are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridSpec {
    columns: u32,
    rows: u32,
}

impl TryFrom<String> for GridSpec {
    type Error = StickerError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<GridSpec> for String {
    fn from(grid: GridSpec) -> Self {
        grid.to_string()
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 4,
        }
    }
}

impl GridSpec {
    /// Validate a grid. Fails with `InvalidGrid` when either side is zero.
    pub fn new(columns: u32, rows: u32) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(StickerError::InvalidGrid { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cells (`columns * rows`).
    pub fn slots(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Row-major index of a cell.
    pub fn index_of(&self, row: u32, col: u32) -> usize {
        row as usize * self.columns as usize + col as usize
    }

    /// (row, col) of a row-major index.
    pub fn position_of(&self, index: usize) -> (u32, u32) {
        let columns = self.columns as usize;
        ((index / columns) as u32, (index % columns) as u32)
    }

    /// Lay the grid over a `width` x `height` sheet.
    ///
    /// Edges use cumulative rounding, so cell widths always sum to exactly
    /// `width` (and heights to `height`).
    pub fn layout(&self, width: u32, height: u32, inset_ratio: f64) -> Vec<GridCell> {
        let xs = cumulative_edges(width, self.columns);
        let ys = cumulative_edges(height, self.rows);

        let mut cells = Vec::with_capacity(self.slots());
        for row in 0..self.rows {
            for col in 0..self.columns {
                let (x0, x1) = (xs[col as usize], xs[col as usize + 1]);
                let (y0, y1) = (ys[row as usize], ys[row as usize + 1]);
                let rect = CellRect::new(x0, y0, x1 - x0, y1 - y0);
                let inset = safe_inset(rect.width, rect.height, inset_ratio);
                cells.push(GridCell {
                    row,
                    col,
                    index: self.index_of(row, col),
                    rect,
                    source: rect.inset(inset).clip_to(width, height),
                });
            }
        }
        cells
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

impl FromStr for GridSpec {
    type Err = StickerError;

    fn from_str(s: &str) -> Result<Self> {
        let (columns, rows) = parse_dimensions(s)?;
        Self::new(columns, rows)
    }
}

/// One cell of a laid-out grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    /// Row-major position (`row * columns + col`).
    pub index: usize,
    /// The full cell rectangle. Its size is the size of the sticker produced.
    pub rect: CellRect,
    /// The inset rectangle actually sampled, clipped to the sheet.
    pub source: CellRect,
}

/// `n + 1` edges splitting `length` into `n` parts with cumulative rounding.
fn cumulative_edges(length: u32, n: u32) -> Vec<u32> {
    let step = length as f64 / n as f64;
    (0..=n)
        .map(|i| ((i as f64 * step).round() as u32).min(length))
        .collect()
}

/// Inward margin that keeps generation grid lines out of a cell.
pub fn safe_inset(cell_width: u32, cell_height: u32, ratio: f64) -> u32 {
    let min_side = cell_width.min(cell_height) as f64;
    ((min_side * ratio).round() as u32).max(1)
}

/// Parse a "WxH" dimension string into (width, height).
pub fn parse_dimensions(s: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = s.trim().splitn(2, ['x', 'X']).collect();
    if parts.len() != 2 {
        return Err(StickerError::Parse {
            message: format!("Invalid dimensions '{}': expected WxH (e.g. 4x4)", s),
            help: Some("Use the format WxH, for example: 4x4, 370x320".to_string()),
        });
    }

    let parse = |part: &str, what: &str| -> Result<u32> {
        part.trim().parse().map_err(|_| StickerError::Parse {
            message: format!("Invalid {} '{}' in dimensions '{}'", what, part, s),
            help: Some(format!("{} must be a non-negative integer", what)),
        })
    };

    Ok((parse(parts[0], "width")?, parse(parts[1], "height")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_rejects_zero() {
        assert!(matches!(
            GridSpec::new(0, 4),
            Err(StickerError::InvalidGrid { columns: 0, rows: 4 })
        ));
        assert!(GridSpec::new(4, 0).is_err());
        assert!(GridSpec::new(1, 1).is_ok());
    }

    #[test]
    fn test_parse_grid() {
        assert_eq!("4x4".parse::<GridSpec>().unwrap(), GridSpec::new(4, 4).unwrap());
        assert_eq!("3X2".parse::<GridSpec>().unwrap(), GridSpec::new(3, 2).unwrap());
        assert!(matches!(
            "0x4".parse::<GridSpec>(),
            Err(StickerError::InvalidGrid { .. })
        ));
        assert!(matches!("abc".parse::<GridSpec>(), Err(StickerError::Parse { .. })));
        assert!("4xb".parse::<GridSpec>().is_err());
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("370x320").unwrap(), (370, 320));
        assert_eq!(parse_dimensions(" 8 x 16 ").unwrap(), (8, 16));
    }

    #[test]
    fn test_index_round_trip() {
        let grid = GridSpec::new(3, 2).unwrap();
        assert_eq!(grid.index_of(1, 2), 5);
        assert_eq!(grid.position_of(5), (1, 2));
        assert_eq!(grid.position_of(3), (1, 0));
    }

    #[test]
    fn test_cumulative_edges_cover_length() {
        for (length, n) in [(400, 4), (401, 4), (1023, 7), (10, 3), (3, 4)] {
            let edges = cumulative_edges(length, n);
            assert_eq!(edges.len(), n as usize + 1);
            assert_eq!(edges[0], 0);
            assert_eq!(edges[n as usize], length);
            assert!(edges.windows(2).all(|w| w[0] <= w[1]));
        }
        assert_eq!(cumulative_edges(10, 3), vec![0, 3, 7, 10]);
    }

    #[test]
    fn test_layout_400_square() {
        let grid = GridSpec::new(4, 4).unwrap();
        let cells = grid.layout(400, 400, DEFAULT_INSET_RATIO);
        assert_eq!(cells.len(), 16);
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.index, i);
            assert_eq!((cell.rect.width, cell.rect.height), (100, 100));
            assert_eq!(cell.source, cell.rect.inset(2));
        }
        assert_eq!(cells[5].rect, CellRect::new(100, 100, 100, 100));
    }

    #[test]
    fn test_layout_widths_sum_exactly() {
        let grid = GridSpec::new(3, 1).unwrap();
        let cells = grid.layout(100, 30, DEFAULT_INSET_RATIO);
        let total: u32 = cells.iter().map(|c| c.rect.width).sum();
        assert_eq!(total, 100);
        let layout: Vec<String> = cells.iter().map(|c| c.rect.to_string()).collect();
        insta::assert_snapshot!(layout.join("\n"), @r"
        33x30+0+0
        34x30+33+0
        33x30+67+0
        ");
    }

    #[test]
    fn test_safe_inset_minimum() {
        assert_eq!(safe_inset(10, 10, 0.02), 1);
        assert_eq!(safe_inset(100, 300, 0.02), 2);
        assert_eq!(safe_inset(512, 512, 0.02), 10);
    }

    #[test]
    fn test_serde_rejects_zero_grid() {
        let grid: GridSpec = serde_yaml::from_str("2x3").unwrap();
        assert_eq!((grid.columns(), grid.rows()), (2, 3));
        assert_eq!(serde_yaml::to_string(&grid).unwrap().trim(), "2x3");
        assert!(serde_yaml::from_str::<GridSpec>("0x3").is_err());
    }
}
