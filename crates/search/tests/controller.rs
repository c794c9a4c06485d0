//! Background search: update stream ordering and cancellation safety.

use std::thread;
use std::time::Duration;

use blockfit_core::{Board, Brick};
use blockfit_search::{
    find_best_sequence, MoveSequence, RequestOutcome, SearchConfig, SearchController, SearchState,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn started(outcome: RequestOutcome) -> std::sync::mpsc::Receiver<blockfit_search::SearchUpdate> {
    match outcome {
        RequestOutcome::Started(rx) => rx,
        RequestOutcome::Duplicate => panic!("expected a new search"),
    }
}

/// Big enough that the generic search is still running when preempted.
fn slow_request() -> (Board, Vec<Brick>) {
    (
        Board::new(12, 12),
        vec![
            Brick::rect(1, 1).unwrap(),
            Brick::line(3).unwrap(),
            Brick::rect(2, 2).unwrap(),
        ],
    )
}

mod stream {
    use super::*;

    #[test]
    fn test_updates_are_monotonic() {
        init_logging();
        let controller = SearchController::new(SearchConfig {
            bit_board: false,
            ..SearchConfig::default()
        });
        let board = Board::from_rows(&["##.....", "#......", ".......", "...#...", "......#"]).unwrap();
        let bricks = [Brick::line(3).unwrap(), Brick::rect(1, 2).unwrap()];
        let rx = started(controller.request(&board, &bricks));

        let mut progress = 0.0f32;
        let mut best_eval = f32::NEG_INFINITY;
        let mut last_best: Option<MoveSequence> = None;
        for update in rx.iter() {
            assert!((0.0..=1.0).contains(&update.progress));
            assert!(update.progress >= progress);
            progress = update.progress;
            if let Some(best) = &update.best {
                assert!(best.final_eval() >= best_eval);
                best_eval = best.final_eval();
            }
            last_best = update.best;
        }
        assert_eq!(progress, 1.0);

        let blocking = find_best_sequence(&board, &bricks, controller.config()).best;
        assert_eq!(
            last_best.map(|s| s.final_eval()),
            blocking.map(|s| s.final_eval())
        );
        assert_eq!(controller.snapshot().state, SearchState::Finished);
    }
}

mod cancellation {
    use super::*;

    fn assert_from_second(best: &MoveSequence, bar: &Brick) {
        assert_eq!(best.len(), 1);
        assert_eq!(&best.placements[0].brick, bar);
        assert!(best.placements[0].is_on_board(4, 4));
    }

    #[test]
    fn test_second_request_hides_first() {
        init_logging();
        let controller = SearchController::default();
        let (board_a, bricks_a) = slow_request();
        let rx_a = started(controller.request(&board_a, &bricks_a));
        // let the first search publish something before preempting it
        let _ = rx_a.recv_timeout(Duration::from_secs(5));

        let board_b = Board::from_rows(&["#...", "....", "..#.", "...."]).unwrap();
        let bar = Brick::line(2).unwrap();
        let rx_b = started(controller.request(&board_b, &[bar.clone()]));

        for _ in 0..20 {
            if let Some(best) = controller.snapshot().best {
                assert_from_second(&best, &bar);
            }
            thread::sleep(Duration::from_millis(1));
        }

        let best = controller.wait().expect("the bar fits");
        assert_from_second(&best, &bar);
        for update in rx_b.iter() {
            if let Some(best) = &update.best {
                assert_from_second(best, &bar);
            }
        }
        // the first stream was closed when its request was superseded
        let _ = rx_a.iter().count();
        assert_from_second(&controller.snapshot().best.unwrap(), &bar);
    }

    #[test]
    fn test_duplicate_while_running() {
        init_logging();
        let controller = SearchController::default();
        let (board, bricks) = slow_request();
        let _rx = started(controller.request(&board, &bricks));
        assert!(matches!(
            controller.request(&board, &bricks),
            RequestOutcome::Duplicate
        ));
        assert_eq!(controller.snapshot().state, SearchState::Running);
        controller.cancel();
        assert_eq!(controller.snapshot().state, SearchState::Idle);
        controller.wait();
        assert_eq!(controller.snapshot().state, SearchState::Idle);
        assert!(controller.snapshot().best.is_none());
    }
}
