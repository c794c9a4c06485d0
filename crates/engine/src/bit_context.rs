//! Per-size precomputed masks for the bit-packed board.
//! Row/column masks drive line clears; placement masks for the reference
//! shapes answer "does it still fit anywhere" with one AND per origin.

use blockfit_core::{Board, Brick, OffsetBrick};
use thiserror::Error;

use crate::bit_board::{BitBoard, BitBrick, BitPlacement};

pub const MAX_CELLS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitBoardError {
    #[error("{width}x{height} board has {} cells, bit-packed boards hold at most 64", .width * .height)]
    TooLarge { width: usize, height: usize },
    #[error("board dimensions must be non-zero (got {width}x{height})")]
    ZeroSize { width: usize, height: usize },
}

/// Shapes whose free space the evaluation rewards keeping available.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ReferenceShape {
    Square3,
    Line5Horizontal,
    Line5Vertical,
}

impl ReferenceShape {
    pub const ALL: [ReferenceShape; 3] = [
        ReferenceShape::Square3,
        ReferenceShape::Line5Horizontal,
        ReferenceShape::Line5Vertical,
    ];

    /// (width, height) of the solid rectangle.
    pub fn dims(self) -> (usize, usize) {
        match self {
            ReferenceShape::Square3 => (3, 3),
            ReferenceShape::Line5Horizontal => (5, 1),
            ReferenceShape::Line5Vertical => (1, 5),
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            ReferenceShape::Square3 => 0,
            ReferenceShape::Line5Horizontal => 1,
            ReferenceShape::Line5Vertical => 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BitContext {
    width: usize,
    height: usize,
    full: u64,
    rows: Vec<u64>,
    columns: Vec<u64>,
    reference: [Vec<u64>; 3],
}

#[inline(always)]
fn low_bits(n: usize) -> u64 {
    if n >= 64 {
        !0
    } else {
        (1u64 << n) - 1
    }
}

impl BitContext {
    /// Whether a board of this size can be bit-packed.
    #[inline]
    pub fn supports(width: usize, height: usize) -> bool {
        width > 0 && height > 0 && width * height <= MAX_CELLS
    }

    pub fn new(width: usize, height: usize) -> Result<Self, BitBoardError> {
        if width == 0 || height == 0 {
            return Err(BitBoardError::ZeroSize { width, height });
        }
        if width * height > MAX_CELLS {
            return Err(BitBoardError::TooLarge { width, height });
        }

        let full = low_bits(width * height);
        let row0 = low_bits(width);
        let rows: Vec<u64> = (0..height).map(|y| row0 << (y * width)).collect();
        let columns: Vec<u64> = (0..width)
            .map(|x| (0..height).fold(0u64, |acc, y| acc | 1u64 << (y * width + x)))
            .collect();

        let mut ctx = Self {
            width,
            height,
            full,
            rows,
            columns,
            reference: [Vec::new(), Vec::new(), Vec::new()],
        };
        for shape in ReferenceShape::ALL {
            let (w, h) = shape.dims();
            ctx.reference[shape.index()] = ctx.rect_placements(w, h);
        }
        Ok(ctx)
    }

    pub fn for_board(board: &Board) -> Result<Self, BitBoardError> {
        Self::new(board.width(), board.height())
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
    pub fn full_mask(&self) -> u64 {
        self.full
    }

    #[inline(always)]
    pub fn row_mask(&self, y: usize) -> u64 {
        self.rows[y]
    }

    #[inline(always)]
    pub fn column_mask(&self, x: usize) -> u64 {
        self.columns[x]
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn encode(&self, board: &Board) -> BitBoard {
        debug_assert_eq!((board.width(), board.height()), (self.width, self.height));
        let bits = board
            .occupancy()
            .enumerate()
            .fold(0u64, |acc, (i, filled)| acc | (filled as u64) << i);
        BitBoard(bits)
    }

    /// Expand to a generic board; occupied cells get marker 0.
    pub fn decode(&self, bits: BitBoard) -> Board {
        let mut board = Board::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if bits.get(self.index(x, y)) {
                    board.set(x, y, Some(0));
                }
            }
        }
        board
    }

    /// Brick word anchored at (0, 0); `None` if it cannot fit this board at all.
    fn brick_word(&self, brick: &Brick) -> Option<u64> {
        if brick.width() > self.width || brick.height() > self.height {
            return None;
        }
        Some(
            brick
                .cells()
                .fold(0u64, |acc, (x, y)| acc | 1u64 << self.index(x, y)),
        )
    }

    /// On-board origins for a `w` x `h` box, y outer, x inner.
    fn origins(&self, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
        let xs = self.width + 1 - w;
        let ys = self.height + 1 - h;
        (0..ys).flat_map(move |y| (0..xs).map(move |x| (x, y)))
    }

    fn rect_placements(&self, w: usize, h: usize) -> Vec<u64> {
        if w > self.width || h > self.height {
            return Vec::new();
        }
        let base = (0..h).fold(0u64, |acc, y| acc | low_bits(w) << (y * self.width));
        self.origins(w, h)
            .map(|(x, y)| base << self.index(x, y))
            .collect()
    }

    /// The bit form of an anchored brick, or `None` when it leaves the board.
    pub fn brick_at(&self, placed: &OffsetBrick) -> Option<BitBrick> {
        if !placed.is_on_board(self.width, self.height) {
            return None;
        }
        let base = self.brick_word(&placed.brick)?;
        Some(BitBrick(
            base << self.index(placed.x as usize, placed.y as usize),
        ))
    }

    /// Every on-board position of the brick with its origin, ignoring
    /// occupancy (y outer, x inner).
    pub fn anchored_placements(&self, brick: &Brick) -> Vec<(usize, usize, BitBrick)> {
        match self.brick_word(brick) {
            Some(base) => self
                .origins(brick.width(), brick.height())
                .map(|(x, y)| (x, y, BitBrick(base << self.index(x, y))))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn placements(&self, brick: &Brick) -> Vec<BitBrick> {
        self.anchored_placements(brick)
            .into_iter()
            .map(|(_, _, p)| p)
            .collect()
    }

    /// Positions of the brick that overlap nothing on `board`, with origins.
    pub fn legal_anchored(&self, board: BitBoard, brick: &Brick) -> Vec<(usize, usize, BitBrick)> {
        let mut out = self.anchored_placements(brick);
        out.retain(|&(_, _, p)| !board.overlaps(p));
        out
    }

    /// Positions of the brick that overlap nothing on `board`.
    pub fn legal_placements(&self, board: BitBoard, brick: &Brick) -> Vec<BitBrick> {
        let mut out = self.placements(brick);
        out.retain(|&p| !board.overlaps(p));
        out
    }

    /// OR the brick in, then clear every full row and column at once.
    #[inline]
    pub fn place(&self, board: BitBoard, brick: BitBrick) -> Option<BitPlacement> {
        if board.overlaps(brick) {
            return None;
        }
        let combined = board.0 | brick.0;
        let mut cleared = 0u64;
        let mut lines_cleared = 0u32;
        for &mask in self.rows.iter().chain(self.columns.iter()) {
            if combined & mask == mask {
                cleared |= mask;
                lines_cleared += 1;
            }
        }
        Some(BitPlacement {
            board: BitBoard(combined & !cleared),
            lines_cleared,
            cleared,
        })
    }

    /// Can the reference shape still go somewhere on this board?
    #[inline]
    pub fn fits_anywhere(&self, board: BitBoard, shape: ReferenceShape) -> bool {
        self.reference[shape.index()]
            .iter()
            .any(|&mask| board.0 & mask == 0)
    }

    /// Recover shape and origin from a single placement word.
    /// The shape is the tight bounding box of the set bits.
    pub fn to_offset_brick(&self, brick: BitBrick) -> Option<OffsetBrick> {
        let bits = brick.0 & self.full;
        if bits == 0 {
            return None;
        }

        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0usize, 0usize);
        let mut rest = bits;
        while rest != 0 {
            let i = rest.trailing_zeros() as usize;
            let (x, y) = (i % self.width, i / self.width);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            rest &= rest - 1;
        }

        let (w, h) = (max_x - min_x + 1, max_y - min_y + 1);
        let mut mask = Vec::with_capacity(w * h);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                mask.push((bits >> self.index(x, y)) & 1 == 1);
            }
        }
        let shape = Brick::new(w, h, mask).ok()?;
        Some(OffsetBrick::new(shape, min_x as i32, min_y as i32))
    }
}
