//! collision detection - board edges and occupied cells

use blockfit_core::{Board, Brick, OffsetBrick};

/// does the brick overlap anything? off-board cells count as overlap
#[inline]
pub fn collides(board: &Board, placed: &OffsetBrick) -> bool {
    if !placed.is_on_board(board.width(), board.height()) {
        return true;
    }
    placed
        .cells()
        .any(|(x, y)| board.get(x as usize, y as usize))
}

/// can we place here? (just !collides)
#[inline]
pub fn can_place(board: &Board, placed: &OffsetBrick) -> bool {
    !collides(board, placed)
}

/// Every origin where the brick fits, scanned row by row (y outer, x inner).
/// Restartable: each call yields a fresh iterator over the same board.
pub fn legal_placements<'a>(
    board: &'a Board,
    brick: &'a Brick,
) -> impl Iterator<Item = OffsetBrick> + 'a {
    let max_x = board.width().checked_sub(brick.width()).map(|m| m as i32 + 1);
    let max_y = board.height().checked_sub(brick.height()).map(|m| m as i32 + 1);
    let (xs, ys) = match (max_x, max_y) {
        (Some(mx), Some(my)) => (mx, my),
        _ => (0, 0),
    };

    (0..ys)
        .flat_map(move |y| (0..xs).map(move |x| (x, y)))
        .filter(move |&(x, y)| {
            brick
                .cells()
                .all(|(cx, cy)| !board.get(x as usize + cx, y as usize + cy))
        })
        .map(move |(x, y)| OffsetBrick::new(brick.clone(), x, y))
}

/// Does the brick fit at any origin?
pub fn can_place_anywhere(board: &Board, brick: &Brick) -> bool {
    legal_placements(board, brick).next().is_some()
}
