//! blockfit-engine - placement rules and the bit-packed board.
//!
//! The generic path works on `blockfit_core::Board` of any size; boards of
//! at most 64 cells can also be packed into a single word through a
//! `BitContext`, with identical placement and line-clear semantics.

pub mod apply;
pub mod bit_board;
pub mod bit_context;
pub mod collision;

pub use apply::{place, place_quiet, PlaceOutcome};
pub use bit_board::{BitBoard, BitBrick, BitPlacement};
pub use bit_context::{BitBoardError, BitContext, ReferenceShape, MAX_CELLS};
pub use collision::{can_place, can_place_anywhere, collides, legal_placements};
