//! Bit-packed board for boards of at most 64 cells.
//! Bit `y * width + x` is cell (x, y). Values only mean something
//! relative to the `BitContext` that produced them.

/// Occupancy of a whole board in one word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct BitBoard(pub u64);

/// A brick shifted to its placement origin, same layout as `BitBoard`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct BitBrick(pub u64);

impl BitBoard {
    pub const EMPTY: Self = Self(0);

    #[inline(always)]
    pub fn bits(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn get(self, index: usize) -> bool {
        (self.0 >> index) & 1 == 1
    }

    #[inline(always)]
    pub fn filled_count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn overlaps(self, brick: BitBrick) -> bool {
        self.0 & brick.0 != 0
    }
}

impl BitBrick {
    #[inline(always)]
    pub fn bits(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn cell_count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Result of a bit-packed placement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BitPlacement {
    pub board: BitBoard,
    pub lines_cleared: u32,
    /// Union of the cleared row and column masks.
    pub cleared: u64,
}
