use blockfit_core::{Board, Marker, OffsetBrick};

use crate::collision::can_place;

/// Everything a placement produces: the new board plus line-clear metadata.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PlaceOutcome {
    pub board: Board,
    /// Rows plus columns cleared.
    pub lines_cleared: usize,
    /// Distinct cells removed (intersections counted once).
    pub cells_cleared: usize,
    pub cleared_rows: Vec<usize>,
    pub cleared_columns: Vec<usize>,
    /// Every cell of the placed brick was inside a cleared row or column.
    pub brick_fully_cleared: bool,
}

/// Place a brick on a copy of the board, then clear full rows and columns
/// simultaneously. `None` when the brick does not fit.
pub fn place(board: &Board, placed: &OffsetBrick, marker: Marker) -> Option<PlaceOutcome> {
    if !can_place(board, placed) {
        return None;
    }

    let mut next = board.clone();
    for (x, y) in placed.cells() {
        next.set(x as usize, y as usize, Some(marker));
    }

    let cleared = next.clear_full_lines();
    let brick_fully_cleared = !cleared.is_empty()
        && placed
            .cells()
            .all(|(x, y)| cleared.covers(x as usize, y as usize));

    Some(PlaceOutcome {
        lines_cleared: cleared.count(),
        cells_cleared: cleared.cell_count(board.width(), board.height()),
        cleared_rows: cleared.rows,
        cleared_columns: cleared.columns,
        brick_fully_cleared,
        board: next,
    })
}

/// Place and return only the cleared board and line count - the search hot path.
#[inline]
pub fn place_quiet(board: &Board, placed: &OffsetBrick) -> Option<(Board, usize)> {
    place(board, placed, 0).map(|o| (o.board, o.lines_cleared))
}
