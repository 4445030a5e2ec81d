//! Property tests for the board, scoring and rotation invariants.

use proptest::prelude::*;

use blockfall::core::pieces::try_rotate;
use blockfall::core::scoring::{line_clear_score, next_level};
use blockfall::core::{Board, GameSession, Occupant, PieceId, SessionConfig, Tetromino};
use blockfall::types::{GameInput, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

fn debris(kind: PieceKind) -> Option<Occupant> {
    Some(Occupant {
        kind,
        owner: PieceId(0),
    })
}

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    (0usize..7).prop_map(|i| PieceKind::ALL[i])
}

fn input_strategy() -> impl Strategy<Value = GameInput> {
    (0usize..6).prop_map(|i| GameInput::ALL[i])
}

/// Random sparse rows: no row is ever full (column 0 stays empty).
fn sparse_board() -> impl Strategy<Value = Board> {
    prop::collection::vec((1i8..BOARD_WIDTH as i8, 0i8..BOARD_HEIGHT as i8), 0..60).prop_map(
        |cells| {
            let mut board = Board::new();
            for (x, y) in cells {
                board.set(x, y, debris(PieceKind::S));
            }
            board
        },
    )
}

proptest! {
    #[test]
    fn clearing_without_full_rows_changes_nothing(board in sparse_board()) {
        let mut after = board.clone();
        prop_assert_eq!(after.clear_full_rows(), 0);
        prop_assert_eq!(after, board);
    }

    #[test]
    fn exactly_one_full_row_is_reported(y in 0i8..BOARD_HEIGHT as i8) {
        let mut board = Board::new();
        let cells: Vec<_> = (0..BOARD_WIDTH as i8).map(|x| (x, y)).collect();
        board.place_piece(PieceId(1), PieceKind::I, &cells);

        for row in 0..BOARD_HEIGHT as i8 {
            prop_assert_eq!(board.is_row_full(row), row == y);
        }
    }

    #[test]
    fn clearing_a_row_shifts_the_row_above_down(
        board in sparse_board(),
        y in 0i8..BOARD_HEIGHT as i8 - 1,
    ) {
        let mut after = board.clone();
        after.clear_row(y);

        for x in 0..BOARD_WIDTH as i8 {
            prop_assert_eq!(after.occupant_at(x, y), board.occupant_at(x, y + 1));
            for below in 0..y {
                prop_assert_eq!(after.occupant_at(x, below), board.occupant_at(x, below));
            }
        }
    }

    #[test]
    fn more_lines_score_more(level in 0u8..=9) {
        for n in 1..4 {
            prop_assert!(line_clear_score(n + 1, level) > line_clear_score(n, level));
        }
    }

    #[test]
    fn level_never_decreases(
        batches in prop::collection::vec(0u32..5, 1..40),
        starting_level in 0u8..=9,
        start_at_zero in any::<bool>(),
    ) {
        let mut level = if start_at_zero { 0 } else { starting_level };
        let mut lines = 0;
        for batch in batches {
            lines += batch;
            let next = next_level(level, lines, starting_level, start_at_zero);
            prop_assert!(next >= level);
            level = next;
        }
    }

    #[test]
    fn rotation_is_bounded_or_leaves_piece_alone(
        kind in kind_strategy(),
        turns in 0u8..4,
        x in 0i8..BOARD_WIDTH as i8,
        y in 0i8..BOARD_HEIGHT as i8,
        board in sparse_board(),
    ) {
        let piece = Tetromino {
            rotation: Rotation::from_index(turns),
            ..Tetromino::new(PieceId(1), kind, x, y)
        };
        if !piece.fits(&board) {
            return Ok(());
        }

        if let Some(rotated) = try_rotate(&board, &piece) {
            prop_assert!((rotated.x - piece.x).abs() <= 2);
            prop_assert!(rotated.y >= piece.y);
            prop_assert!(rotated.fits(&board));
            prop_assert_eq!((rotated.id, rotated.kind), (piece.id, piece.kind));
        }
    }

    #[test]
    fn random_play_keeps_board_consistent(
        seed in any::<u32>(),
        script in prop::collection::vec((input_strategy(), 0u32..200), 1..120),
    ) {
        let mut session = GameSession::new(SessionConfig::with_seed(seed));
        session.start();

        for (input, dt) in script {
            let before = session.active();
            if !session.press(input) && input == GameInput::Rotate {
                prop_assert_eq!(session.active(), before);
            }
            session.tick(dt);
            session.release(input);

            let snap = session.snapshot();
            prop_assert!(session.swaps_used() <= session.config().max_swaps);
            if let Some(active) = session.active() {
                prop_assert!(active.fits(session.board()));
                let ghost = snap.ghost_y.unwrap_or(active.y);
                prop_assert!(ghost <= active.y);
            }
            if session.game_over() {
                break;
            }
        }
    }
}
