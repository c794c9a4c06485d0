//! Brick shapes - immutable occupancy masks over a bounding box.
//! Row-major, (0, 0) is the top-left cell of the box.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("mask has {len} cells but a {width}x{height} box needs {}", .width * .height)]
    MaskLength {
        width: usize,
        height: usize,
        len: usize,
    },
    #[error("brick dimensions must be non-zero (got {width}x{height})")]
    ZeroSize { width: usize, height: usize },
    #[error("row {row} has length {len}, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Polyomino shape. Equality and hashing are by shape content.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBrick", into = "RawBrick")]
pub struct Brick {
    width: usize,
    height: usize,
    mask: Vec<bool>,
}

#[derive(Serialize, Deserialize)]
struct RawBrick {
    width: usize,
    height: usize,
    mask: Vec<bool>,
}

impl TryFrom<RawBrick> for Brick {
    type Error = ShapeError;

    fn try_from(raw: RawBrick) -> Result<Self, Self::Error> {
        Brick::new(raw.width, raw.height, raw.mask)
    }
}

impl From<Brick> for RawBrick {
    fn from(brick: Brick) -> Self {
        RawBrick {
            width: brick.width,
            height: brick.height,
            mask: brick.mask,
        }
    }
}

impl Brick {
    pub fn new(width: usize, height: usize, mask: Vec<bool>) -> Result<Self, ShapeError> {
        if width == 0 || height == 0 {
            return Err(ShapeError::ZeroSize { width, height });
        }
        if mask.len() != width * height {
            return Err(ShapeError::MaskLength {
                width,
                height,
                len: mask.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mask,
        })
    }

    /// Fully occupied `width` x `height` rectangle.
    pub fn rect(width: usize, height: usize) -> Result<Self, ShapeError> {
        Self::new(width, height, vec![true; width * height])
    }

    /// Horizontal run of `len` cells.
    pub fn line(len: usize) -> Result<Self, ShapeError> {
        Self::rect(len, 1)
    }

    /// Parse a diagram, one string per row: `#` occupied, anything else free.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ShapeError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut mask = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(ShapeError::RaggedRows {
                    row,
                    len,
                    expected: width,
                });
            }
            mask.extend(line.chars().map(|c| c == '#'));
        }
        Self::new(width, height, mask)
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
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.mask[y * self.width + x]
    }

    pub fn cell_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Occupied cells as (x, y) relative to the box origin, row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(move |(i, _)| (i % width, i / width))
    }

    fn remap(
        &self,
        width: usize,
        height: usize,
        src: impl Fn(usize, usize) -> (usize, usize),
    ) -> Self {
        let mut mask = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = src(x, y);
                mask.push(self.mask[sy * self.width + sx]);
            }
        }
        Self {
            width,
            height,
            mask,
        }
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate(&self) -> Self {
        let h = self.height;
        self.remap(self.height, self.width, |x, y| (y, h - 1 - x))
    }

    pub fn flip_horizontal(&self) -> Self {
        let w = self.width;
        self.remap(self.width, self.height, |x, y| (w - 1 - x, y))
    }

    pub fn flip_vertical(&self) -> Self {
        let h = self.height;
        self.remap(self.width, self.height, |x, y| (x, h - 1 - y))
    }

    /// Overlay two bricks anchored at the same origin.
    pub fn union(&self, other: &Brick) -> Self {
        let width = self.width.max(other.width);
        let height = self.height.max(other.height);
        let mut mask = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                mask.push(self.get(x, y) || other.get(x, y));
            }
        }
        Self {
            width,
            height,
            mask,
        }
    }
}

impl std::fmt::Debug for Brick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Brick({}x{} ", self.width, self.height)?;
        for (y, row) in self.mask.chunks(self.width).enumerate() {
            if y > 0 {
                write!(f, "/")?;
            }
            for &m in row {
                write!(f, "{}", if m { '#' } else { '.' })?;
            }
        }
        write!(f, ")")
    }
}

/// A brick anchored at a board origin. Coordinates may be negative or
/// overhang the board; `is_on_board` is the bounds test.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct OffsetBrick {
    pub brick: Brick,
    pub x: i32,
    pub y: i32,
}

impl OffsetBrick {
    pub fn new(brick: Brick, x: i32, y: i32) -> Self {
        Self { brick, x, y }
    }

    /// Absolute occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.brick
            .cells()
            .map(move |(cx, cy)| (self.x + cx as i32, self.y + cy as i32))
    }

    pub fn rows(&self) -> std::ops::Range<i32> {
        self.y..self.y + self.brick.height() as i32
    }

    pub fn columns(&self) -> std::ops::Range<i32> {
        self.x..self.x + self.brick.width() as i32
    }

    pub fn is_on_board(&self, width: usize, height: usize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x as usize + self.brick.width() <= width
            && self.y as usize + self.brick.height() <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Brick {
        Brick::from_rows(&["#.", "#.", "##"]).expect("valid diagram")
    }

    #[test]
    fn test_mask_length_rejected() {
        let err = Brick::new(2, 2, vec![true; 3]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::MaskLength {
                width: 2,
                height: 2,
                len: 3
            }
        );
        assert!(Brick::new(0, 3, vec![]).is_err());
    }

    #[test]
    fn test_rotate_l() {
        let r = l_shape().rotate();
        assert_eq!(r, Brick::from_rows(&["###", "#.."]).unwrap());
        assert_eq!(r.width(), 3);
        assert_eq!(r.height(), 2);
    }

    #[test]
    fn test_four_rotations_identity() {
        let b = l_shape();
        assert_eq!(b.rotate().rotate().rotate().rotate(), b);
    }

    #[test]
    fn test_flips() {
        let b = l_shape();
        assert_eq!(b.flip_horizontal(), Brick::from_rows(&[".#", ".#", "##"]).unwrap());
        assert_eq!(b.flip_vertical(), Brick::from_rows(&["##", "#.", "#."]).unwrap());
        assert_eq!(b.flip_vertical().flip_vertical(), b);
    }

    #[test]
    fn test_union() {
        let a = Brick::line(3).unwrap();
        let b = Brick::rect(1, 3).unwrap();
        let u = a.union(&b);
        assert_eq!(u, Brick::from_rows(&["###", "#..", "#.."]).unwrap());
        assert_eq!(u.cell_count(), 5);
    }

    #[test]
    fn test_offset_cells_and_bounds() {
        let ob = OffsetBrick::new(l_shape(), 3, 1);
        let cells: Vec<_> = ob.cells().collect();
        assert_eq!(cells, vec![(3, 1), (3, 2), (3, 3), (4, 3)]);
        assert_eq!(ob.rows(), 1..4);
        assert_eq!(ob.columns(), 3..5);
        assert!(ob.is_on_board(5, 4));
        assert!(!ob.is_on_board(4, 4));
        assert!(!OffsetBrick::new(l_shape(), -1, 0).is_on_board(8, 8));
    }

    #[test]
    fn test_serde_rejects_bad_mask() {
        let json = r#"{"width":2,"height":2,"mask":[true,true,true]}"#;
        assert!(serde_json::from_str::<Brick>(json).is_err());
        let ok = serde_json::to_string(&l_shape()).unwrap();
        assert_eq!(serde_json::from_str::<Brick>(&ok).unwrap(), l_shape());
    }
}
