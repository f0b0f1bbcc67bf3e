//! Engine tests - game rules through the public API

use std::time::Duration;

use ws_tetris::core::{Board, Engine, Piece};
use ws_tetris::types::{Direction, BOARD_WIDTH};

/// Drop the current piece straight down until it locks
fn hard_drop(engine: &mut Engine) -> Piece {
    let mut last = engine.current_piece();
    while engine.move_piece(Direction::Down) {
        last = engine.current_piece();
    }
    last
}

#[test]
fn test_wall_stops_piece() {
    let mut engine = Engine::new(10);
    for _ in 0..BOARD_WIDTH {
        engine.move_piece(Direction::Left);
    }
    let at_wall = engine.state().clone();
    assert!(engine.current_piece().cells().iter().any(|&(x, _)| x == 0));

    assert!(!engine.move_piece(Direction::Left));
    assert_eq!(engine.state(), &at_wall);

    for _ in 0..BOARD_WIDTH {
        engine.move_piece(Direction::Right);
    }
    assert!(engine.current_piece().cells().iter().any(|&(x, _)| x == 9));
    let at_right = engine.state().clone();
    assert!(!engine.move_piece(Direction::Right));
    assert_eq!(engine.state(), &at_right);
}

#[test]
fn test_piece_lands_on_floor() {
    let mut engine = Engine::new(11);
    let kind = engine.current_piece().kind;
    let landed = hard_drop(&mut engine);

    let bottom = landed.cells().iter().map(|&(_, y)| y).max().unwrap();
    assert_eq!(bottom, 19);
    for (x, y) in landed.cells() {
        assert_eq!(engine.board().get(x, y), Some(kind.cell_id()));
    }
    // The next piece took its place at the spawn anchor.
    assert_eq!((engine.current_piece().x, engine.current_piece().y), (4, 0));
}

#[test]
fn test_four_rotations_are_identity() {
    for seed in 0..20 {
        let mut engine = Engine::new(seed);
        engine.move_piece(Direction::Down);
        engine.move_piece(Direction::Down);
        let before = engine.state().clone();
        for _ in 0..4 {
            assert!(engine.move_piece(Direction::Rotate));
        }
        assert_eq!(engine.state(), &before);
    }
}

#[test]
fn test_filling_gap_clears_line() {
    for seed in 0..30 {
        let probe = Engine::new(seed);
        let piece = probe.current_piece();
        let cells = piece.cells();
        let bottom = cells.iter().map(|&(_, y)| y).max().unwrap();
        let gaps: Vec<i8> = cells
            .iter()
            .filter(|&&(_, y)| y == bottom)
            .map(|&(x, _)| x)
            .collect();

        let mut board = Board::new();
        for x in 0..BOARD_WIDTH as i8 {
            if !gaps.contains(&x) {
                board.set(x, 19, 1);
            }
        }

        let mut engine = Engine::with_board(seed, board);
        assert_eq!(engine.current_piece(), piece);
        hard_drop(&mut engine);

        let state = engine.state();
        assert_eq!(state.lines_cleared, 1, "seed {}", seed);
        assert_eq!(state.score, 40);
        assert_eq!(state.level, 1);
        // Only the blocks that sat above the cleared row remain.
        assert_eq!(state.board.filled_count(), 4 - gaps.len());
    }
}

#[test]
fn test_scoring_and_leveling() {
    let mut engine = Engine::new(1);
    assert!(!engine.update_score(4));
    assert_eq!(engine.state().score, 1200);
    assert!(!engine.update_score(3));
    assert_eq!(engine.state().score, 1500);
    assert!(!engine.update_score(2));
    assert_eq!(engine.state().score, 1600);
    assert_eq!(engine.state().lines_cleared, 9);
    assert_eq!(engine.tick_interval(), Duration::from_millis(800));

    assert!(engine.update_score(1));
    assert_eq!(engine.state().score, 1640);
    assert_eq!(engine.state().level, 2);
    assert_eq!(engine.tick_interval(), Duration::from_millis(750));

    // Level 2 doubles the base award.
    engine.update_score(1);
    assert_eq!(engine.state().score, 1720);
}

#[test]
fn test_blocked_spawn_freezes_game() {
    let mut board = Board::new();
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, 0, 3);
        board.set(x, 1, 3);
    }
    let mut engine = Engine::with_board(4, board.clone());
    assert!(engine.is_game_over());

    let frozen = engine.state().clone();
    assert!(!engine.move_piece(Direction::Left));
    assert!(!engine.move_piece(Direction::Rotate));
    assert!(!engine.move_piece(Direction::Down));
    assert!(!engine.tick());
    assert_eq!(engine.state(), &frozen);
    assert_eq!(engine.board(), &board);

    engine.reset();
    assert!(!engine.is_game_over());
    assert!(engine.board().is_empty());
}

#[test]
fn test_reset_after_play() {
    let mut engine = Engine::new(99);
    while !engine.is_game_over() {
        engine.tick();
    }
    engine.reset();

    let state = engine.state();
    assert!(state.board.is_empty());
    assert_eq!(state.score, 0);
    assert_eq!(state.level, 1);
    assert_eq!(state.lines_cleared, 0);
    assert!(!state.game_over);
    assert_eq!((state.current_piece.x, state.current_piece.y), (4, 0));
    assert!(engine.is_valid_position(&state.current_piece));
    assert_eq!(engine.tick_interval(), Duration::from_millis(800));
}

#[test]
fn test_same_seed_same_game() {
    let mut a = Engine::new(2024);
    let mut b = Engine::new(2024);
    let moves = [
        Direction::Left,
        Direction::Rotate,
        Direction::Down,
        Direction::Right,
        Direction::Down,
    ];
    for i in 0..500 {
        let dir = moves[i % moves.len()];
        assert_eq!(a.move_piece(dir), b.move_piece(dir));
        assert_eq!(a.state(), b.state());
    }
}

#[test]
fn test_cells_stay_in_range_through_play() {
    let mut engine = Engine::new(7);
    for i in 0..2000 {
        if engine.is_game_over() {
            engine.reset();
        }
        let dir = match i % 7 {
            0 | 3 => Direction::Left,
            1 | 5 => Direction::Right,
            2 => Direction::Rotate,
            _ => Direction::Down,
        };
        engine.move_piece(dir);
        assert!(engine.board().cells().iter().all(|&c| c <= 7));
    }
}
