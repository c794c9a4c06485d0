//! board representation - flat row-major cells, each free or tagged with a marker
//! any size; the 64-cell bit-packed form lives in the engine crate

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("row {row} has {len} cells, expected {expected}")]
    RowLength {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("unknown cell character {ch:?} at ({x}, {y})")]
    UnknownCell { ch: char, x: usize, y: usize },
}

/// Marker stored in an occupied cell (brick color in the colored variant).
pub type Marker = u8;

/// width x height grid. Row 0 is the top row, (x, y) = (column, row).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Marker>>,
}

/// Rows and columns removed by one simultaneous clear.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ClearedLines {
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
}

impl ClearedLines {
    #[inline]
    pub fn count(&self) -> usize {
        self.rows.len() + self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    /// Distinct cells removed - intersections counted once.
    pub fn cell_count(&self, width: usize, height: usize) -> usize {
        let (r, c) = (self.rows.len(), self.columns.len());
        r * width + c * height - r * c
    }

    pub fn covers(&self, x: usize, y: usize) -> bool {
        self.rows.contains(&y) || self.columns.contains(&x)
    }
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Parse a diagram, one string per row.
    /// `.` free, `#` occupied with marker 0, `0`-`9` occupied with that marker.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);
        for (y, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(BoardError::RowLength {
                    row: y,
                    len,
                    expected: width,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    '#' => Some(0),
                    d if d.is_ascii_digit() => Some(d as u8 - b'0'),
                    _ => return Err(BoardError::UnknownCell { ch, x, y }),
                };
                cells.push(cell);
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x].is_some()
    }

    #[inline(always)]
    pub fn marker(&self, x: usize, y: usize) -> Option<Marker> {
        self.cells[y * self.width + x]
    }

    /// Occupancy at signed coordinates; off-board reads as occupied.
    #[inline]
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return true;
        }
        self.get(x as usize, y as usize)
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Option<Marker>) {
        self.cells[y * self.width + x] = cell;
    }

    /// Row-major occupancy flags.
    pub fn occupancy(&self) -> impl Iterator<Item = bool> + '_ {
        self.cells.iter().map(Option::is_some)
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        (0..self.width).all(|x| self.get(x, y))
    }

    pub fn is_column_full(&self, x: usize) -> bool {
        (0..self.height).all(|y| self.get(x, y))
    }

    /// Find every full row and column, then empty them all at once.
    /// A cell on a cleared row/column intersection is cleared exactly once.
    pub fn clear_full_lines(&mut self) -> ClearedLines {
        let rows: Vec<usize> = (0..self.height).filter(|&y| self.is_row_full(y)).collect();
        let columns: Vec<usize> = (0..self.width).filter(|&x| self.is_column_full(x)).collect();

        for &y in &rows {
            for x in 0..self.width {
                self.set(x, y, None);
            }
        }
        for &x in &columns {
            for y in 0..self.height {
                self.set(x, y, None);
            }
        }

        ClearedLines { rows, columns }
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", if self.get(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Board {}x{}", self.width, self.height)?;
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut b = Board::new(8, 8);
        b.set(5, 3, Some(2));
        assert!(b.get(5, 3));
        assert_eq!(b.marker(5, 3), Some(2));
        assert!(!b.get(4, 3));
        assert_eq!(b.filled_count(), 1);
    }

    #[test]
    fn test_off_board_is_blocked() {
        let b = Board::new(4, 3);
        assert!(b.is_blocked(-1, 0));
        assert!(b.is_blocked(0, 3));
        assert!(b.is_blocked(4, 0));
        assert!(!b.is_blocked(3, 2));
    }

    #[test]
    fn test_from_rows() {
        let b = Board::from_rows(&["#..", ".3.", "..."]).unwrap();
        assert_eq!(b.width(), 3);
        assert_eq!(b.height(), 3);
        assert_eq!(b.marker(0, 0), Some(0));
        assert_eq!(b.marker(1, 1), Some(3));
        assert_eq!(b.filled_count(), 2);
        assert!(Board::from_rows(&["..", "."]).is_err());
        assert!(Board::from_rows(&["x."]).is_err());
    }

    #[test]
    fn test_clear_single_row() {
        let mut b = Board::from_rows(&["####", "#...", "...."]).unwrap();
        let cleared = b.clear_full_lines();
        assert_eq!(cleared.rows, vec![0]);
        assert!(cleared.columns.is_empty());
        assert_eq!(cleared.cell_count(4, 3), 4);
        // rows do not shift - the cleared row simply empties
        assert!(b.get(0, 1));
        assert!(!b.get(0, 0));
    }

    #[test]
    fn test_clear_row_and_column_simultaneously() {
        let mut b = Board::from_rows(&["####", "#...", "#...", "#..."]).unwrap();
        let cleared = b.clear_full_lines();
        assert_eq!(cleared.rows, vec![0]);
        assert_eq!(cleared.columns, vec![0]);
        assert_eq!(cleared.count(), 2);
        assert_eq!(cleared.cell_count(4, 4), 7);
        assert!(b.is_empty());
    }

    #[test]
    fn test_display_roundtrip() {
        let b = Board::from_rows(&["#.#", "..#"]).unwrap();
        let text = b.to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(Board::from_rows(&rows).unwrap(), b);
    }
}
