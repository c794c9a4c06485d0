//! blockfit core crate - brick shapes, the generic board, and the brick catalog.

mod board;
mod brick;
pub mod catalog;

pub use board::{Board, BoardError, ClearedLines, Marker};
pub use brick::{Brick, OffsetBrick, ShapeError};
