//! One capability set over both board representations, so the search and
//! the greedy baseline are written once.

use blockfit_core::{Board, Brick, OffsetBrick};
use blockfit_engine::{legal_placements, place_quiet, BitBoard, BitBrick, BitContext};
use blockfit_eval::{evaluate, evaluate_bits, EvalWeights};

pub trait Playfield: Sized + Send + Sync {
    type Placement: Clone + Send + Sync;

    /// Legal positions of `brick`, y outer, x inner.
    fn legal_placements(&self, brick: &Brick) -> Vec<Self::Placement>;

    /// Place and clear lines; `None` when the placement is illegal here.
    fn place(&self, placement: &Self::Placement) -> Option<(Self, usize)>;

    fn evaluate(&self) -> f32;

    /// Anchored form of a placement of `brick`.
    fn offset_brick(&self, brick: &Brick, placement: &Self::Placement) -> OffsetBrick;

    /// Inverse of `offset_brick`; `None` if it does not fit this board size.
    fn placement_of(&self, placed: &OffsetBrick) -> Option<Self::Placement>;
}

/// Cell-array board of any size.
#[derive(Clone, Debug)]
pub struct GenericField<'w> {
    pub board: Board,
    weights: &'w EvalWeights,
}

impl<'w> GenericField<'w> {
    pub fn new(board: Board, weights: &'w EvalWeights) -> Self {
        Self { board, weights }
    }
}

impl Playfield for GenericField<'_> {
    type Placement = OffsetBrick;

    fn legal_placements(&self, brick: &Brick) -> Vec<OffsetBrick> {
        legal_placements(&self.board, brick).collect()
    }

    fn place(&self, placement: &OffsetBrick) -> Option<(Self, usize)> {
        let (board, lines) = place_quiet(&self.board, placement)?;
        Some((
            Self {
                board,
                weights: self.weights,
            },
            lines,
        ))
    }

    fn evaluate(&self) -> f32 {
        evaluate(&self.board, self.weights)
    }

    fn offset_brick(&self, _brick: &Brick, placement: &OffsetBrick) -> OffsetBrick {
        placement.clone()
    }

    fn placement_of(&self, placed: &OffsetBrick) -> Option<OffsetBrick> {
        Some(placed.clone())
    }
}

/// Bit placement with the origin it was generated at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitMove {
    pub x: usize,
    pub y: usize,
    pub brick: BitBrick,
}

/// Single-word board of at most 64 cells.
#[derive(Clone, Copy, Debug)]
pub struct BitField<'c> {
    pub board: BitBoard,
    ctx: &'c BitContext,
    weights: &'c EvalWeights,
}

impl<'c> BitField<'c> {
    pub fn new(ctx: &'c BitContext, board: &Board, weights: &'c EvalWeights) -> Self {
        Self {
            board: ctx.encode(board),
            ctx,
            weights,
        }
    }
}

impl Playfield for BitField<'_> {
    type Placement = BitMove;

    fn legal_placements(&self, brick: &Brick) -> Vec<BitMove> {
        self.ctx
            .legal_anchored(self.board, brick)
            .into_iter()
            .map(|(x, y, brick)| BitMove { x, y, brick })
            .collect()
    }

    #[inline]
    fn place(&self, placement: &BitMove) -> Option<(Self, usize)> {
        let placed = self.ctx.place(self.board, placement.brick)?;
        Some((
            Self {
                board: placed.board,
                ..*self
            },
            placed.lines_cleared as usize,
        ))
    }

    #[inline]
    fn evaluate(&self) -> f32 {
        evaluate_bits(self.ctx, self.board, self.weights)
    }

    fn offset_brick(&self, brick: &Brick, placement: &BitMove) -> OffsetBrick {
        OffsetBrick::new(brick.clone(), placement.x as i32, placement.y as i32)
    }

    fn placement_of(&self, placed: &OffsetBrick) -> Option<BitMove> {
        let brick = self.ctx.brick_at(placed)?;
        Some(BitMove {
            x: placed.x as usize,
            y: placed.y as usize,
            brick,
        })
    }
}
