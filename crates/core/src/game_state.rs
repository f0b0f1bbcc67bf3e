//! Game state module - the engine that owns one game
//!
//! [`Engine`] ties together the board, the active piece, the randomizer and
//! scoring. It is a two-state machine: playing, or game over (terminal until
//! [`Engine::reset`]). Every operation is total; collisions and walls turn
//! moves into no-ops instead of errors.

use std::time::Duration;

use crate::board::Board;
use crate::pieces::Piece;
use crate::rng::PieceRng;
use crate::scoring::{level_for_lines, line_clear_points, tick_interval_for_level};
use crate::types::{Direction, PieceType, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL};

/// Complete observable game state
///
/// This is the unit that gets serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_piece: Piece,
    pub next_piece: PieceType,
    pub score: u32,
    /// Starts at 1, never decreases within a game
    pub level: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
}

impl GameState {
    /// Initial state with an empty board; `first` is placed at the spawn anchor
    pub fn new(first: PieceType, next: PieceType) -> Self {
        Self {
            board: Board::new(),
            current_piece: Piece::spawn(first),
            next_piece: next,
            score: 0,
            level: 1,
            lines_cleared: 0,
            game_over: false,
        }
    }
}

/// One game: state, randomizer and gravity interval
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    rng: PieceRng,
    tick_interval: Duration,
}

impl Engine {
    /// Create a game with the given RNG seed and spawn the first piece
    pub fn new(seed: u64) -> Self {
        Self::with_rng(PieceRng::new(seed))
    }

    /// Create a game seeded from entropy
    pub fn with_random_seed() -> Self {
        Self::with_rng(PieceRng::from_entropy())
    }

    fn with_rng(mut rng: PieceRng) -> Self {
        let first = rng.next_piece();
        let next = rng.next_piece();
        Self {
            state: GameState::new(first, next),
            rng,
            tick_interval: tick_interval_for_level(1),
        }
    }

    /// Start a game on a prepared board
    ///
    /// If the first piece does not fit, the game starts in game over.
    pub fn with_board(seed: u64, board: Board) -> Self {
        let mut engine = Self::new(seed);
        engine.state.board = board;
        if !engine.is_valid_position(&engine.state.current_piece) {
            engine.state.game_over = true;
        }
        engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn current_piece(&self) -> Piece {
        self.state.current_piece
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    /// Current gravity interval (depends on level)
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Seed of this engine's randomizer
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Start a fresh game from any state
    pub fn reset(&mut self) {
        self.state.board.clear();
        self.state.score = 0;
        self.state.level = 1;
        self.state.lines_cleared = 0;
        self.state.game_over = false;
        self.tick_interval = tick_interval_for_level(1);

        self.state.next_piece = self.rng.next_piece();
        self.spawn_piece();
    }

    /// Promote the next piece to the spawn anchor and draw a new next piece
    ///
    /// Sets game over when the spawned piece does not fit (lockout).
    pub fn spawn_piece(&mut self) {
        self.state.current_piece = Piece::spawn(self.state.next_piece);
        self.state.next_piece = self.rng.next_piece();

        if !self.is_valid_position(&self.state.current_piece) {
            self.state.game_over = true;
        }
    }

    /// Check that every block is inside the walls, above the floor, and not
    /// on a settled cell
    ///
    /// Blocks above the top edge (y < 0) skip the occupancy check.
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        piece.cells().iter().all(|&(x, y)| {
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return false;
            }
            y < 0 || self.state.board.get(x, y) == Some(EMPTY_CELL)
        })
    }

    /// Try to move the current piece
    ///
    /// Returns true if the piece moved. A blocked `Down` locks the piece;
    /// any other blocked move leaves the state untouched.
    pub fn move_piece(&mut self, direction: Direction) -> bool {
        if self.state.game_over {
            return false;
        }

        let current = self.state.current_piece;
        let candidate = match direction {
            Direction::Left => current.shifted(-1, 0),
            Direction::Right => current.shifted(1, 0),
            Direction::Down => current.shifted(0, 1),
            Direction::Rotate => current.rotated_cw(),
        };

        if self.is_valid_position(&candidate) {
            self.state.current_piece = candidate;
            return true;
        }

        if direction == Direction::Down {
            self.lock_piece();
        }

        false
    }

    /// One gravity step; same as `move_piece(Down)` while playing
    pub fn tick(&mut self) -> bool {
        self.move_piece(Direction::Down)
    }

    /// Settle the current piece, clear lines, score, and spawn the next piece
    ///
    /// Returns the number of lines cleared.
    pub fn lock_piece(&mut self) -> u32 {
        let piece = self.state.current_piece;
        let id = piece.kind.cell_id();

        // Blocks above the top edge are dropped.
        for (x, y) in piece.cells() {
            if !Board::is_out_of_bounds(x, y) {
                self.state.board.set(x, y, id);
            }
        }

        let lines = self.clear_lines();
        if lines > 0 {
            self.update_score(lines);
        }

        self.spawn_piece();
        lines
    }

    /// Remove every full row; returns how many were removed
    pub fn clear_lines(&mut self) -> u32 {
        self.state.board.clear_full_rows()
    }

    /// Award points for `lines` at the current level and advance the level
    ///
    /// Returns true when the level went up (and the tick interval changed).
    pub fn update_score(&mut self, lines: u32) -> bool {
        self.state.score = self
            .state
            .score
            .saturating_add(line_clear_points(lines, self.state.level));
        self.state.lines_cleared = self.state.lines_cleared.saturating_add(lines);

        let new_level = level_for_lines(self.state.lines_cleared);
        if new_level > self.state.level {
            self.state.level = new_level;
            self.tick_interval = tick_interval_for_level(new_level);
            return true;
        }

        false
    }
}
