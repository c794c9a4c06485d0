//! Myopic baseline: each brick takes its immediately best spot among those
//! that still let the rest of its ordering be placed. Only a yardstick for
//! the real search.

use blockfit_core::{Board, Brick};
use blockfit_engine::BitContext;

use crate::playfield::{BitField, GenericField, Playfield};
use crate::{permutations, MoveSequence, SearchConfig};

/// Final evaluation of the best greedy ordering. `None` exactly when no
/// ordering can place every brick (see `any_full_sequence`).
pub fn greedy_baseline(board: &Board, bricks: &[Brick], config: &SearchConfig) -> Option<f32> {
    greedy_sequence(board, bricks, config).map(|seq| seq.final_eval())
}

pub fn greedy_sequence(board: &Board, bricks: &[Brick], config: &SearchConfig) -> Option<MoveSequence> {
    if bricks.is_empty() {
        return None;
    }
    if config.bit_board {
        if let Ok(ctx) = BitContext::for_board(board) {
            return best_greedy(&BitField::new(&ctx, board, &config.weights), bricks);
        }
    }
    best_greedy(&GenericField::new(board.clone(), &config.weights), bricks)
}

fn best_greedy<F: Playfield>(root: &F, bricks: &[Brick]) -> Option<MoveSequence> {
    let indices: Vec<usize> = (0..bricks.len()).collect();
    let mut best: Option<MoveSequence> = None;
    for order in permutations(&indices) {
        let Some(seq) = greedy_order(root, bricks, &order) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| seq.final_eval() > b.final_eval()) {
            best = Some(seq);
        }
    }
    best
}

fn greedy_order<F: Playfield>(root: &F, bricks: &[Brick], order: &[usize]) -> Option<MoveSequence> {
    let mut current: Option<F> = None;
    let mut placements = Vec::with_capacity(order.len());
    let mut evaluations = Vec::with_capacity(order.len());

    for (step, &index) in order.iter().enumerate() {
        let brick = &bricks[index];
        let rest = &order[step + 1..];
        let field = current.as_ref().unwrap_or(root);
        let mut candidates: Vec<(F::Placement, F, f32)> = field
            .legal_placements(brick)
            .into_iter()
            .filter_map(|p| {
                let (next, _) = field.place(&p)?;
                let eval = next.evaluate();
                Some((p, next, eval))
            })
            .collect();
        // best first; the stable sort keeps scan order among equals
        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));
        let (choice, next, eval) = candidates
            .into_iter()
            .find(|(_, next, _)| fits_in_order(next, bricks, rest))?;
        placements.push(field.offset_brick(brick, &choice));
        evaluations.push(eval);
        current = Some(next);
    }
    Some(MoveSequence::new(placements, evaluations))
}

/// Can `order` still be placed, one brick after another, from `field`?
fn fits_in_order<F: Playfield>(field: &F, bricks: &[Brick], order: &[usize]) -> bool {
    let Some((&first, rest)) = order.split_first() else {
        return true;
    };
    field
        .legal_placements(&bricks[first])
        .iter()
        .filter_map(|p| field.place(p))
        .any(|(next, _)| fits_in_order(&next, bricks, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfit_eval::evaluate;

    #[test]
    fn test_no_fit_is_none() {
        let board = Board::from_rows(&["#.#", "###", "#.#"]).unwrap();
        let bar = Brick::line(2).unwrap();
        assert_eq!(greedy_baseline(&board, &[bar], &SearchConfig::default()), None);
        assert_eq!(greedy_baseline(&board, &[], &SearchConfig::default()), None);
    }

    #[test]
    fn test_single_brick_is_optimal() {
        let board = Board::from_rows(&["####.", ".....", ".....", "....."]).unwrap();
        let config = SearchConfig::default();
        let dot = Brick::rect(1, 1).unwrap();
        let seq = greedy_sequence(&board, &[dot], &config).unwrap();
        assert_eq!((seq.placements[0].x, seq.placements[0].y), (4, 0));
        assert_eq!(seq.final_eval(), evaluate(&Board::new(5, 4), &config.weights));
    }

    #[test]
    fn test_avoids_dead_end() {
        // a dot at (0, 1) leaves the bar nowhere to go
        let board = Board::from_rows(&[".##", "..#", "###"]).unwrap();
        let bricks = [Brick::rect(1, 1).unwrap(), Brick::rect(1, 2).unwrap()];
        let config = SearchConfig::default();
        assert!(crate::any_full_sequence(&board, &bricks));
        let seq = greedy_sequence(&board, &bricks, &config).expect("a full placement exists");
        assert_eq!(seq.len(), 2);
        assert_eq!(greedy_baseline(&board, &bricks, &config), Some(seq.final_eval()));
    }

    #[test]
    fn test_representations_agree() {
        let board = Board::from_rows(&["#....", "..#..", ".....", "...##"]).unwrap();
        let bricks = [Brick::rect(2, 2).unwrap(), Brick::line(3).unwrap()];
        let bits = greedy_sequence(&board, &bricks, &SearchConfig::default());
        let generic = greedy_sequence(
            &board,
            &bricks,
            &SearchConfig {
                bit_board: false,
                ..SearchConfig::default()
            },
        );
        assert!(bits.is_some());
        assert_eq!(bits, generic);
    }
}
