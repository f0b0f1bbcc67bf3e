//! Core game logic module - pure, deterministic, and testable
//!
//! All game rules and state live here. Nothing in this crate touches the
//! network, the clock, or the terminal:
//!
//! - **Deterministic**: the same seed produces the same piece sequence
//! - **Testable**: every rule is a plain method call on [`Engine`]
//! - **Owned**: one [`Engine`] per session, never shared between sessions
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of settled cells with line clearing
//! - [`pieces`]: static shape table and the active [`Piece`]
//! - [`rng`]: per-engine seeded piece randomizer
//! - [`scoring`]: classic line scores, level and gravity curves
//! - [`game_state`]: the [`Engine`] state machine and its [`GameState`]
//!
//! # Example
//!
//! ```
//! use ws_tetris_core::Engine;
//! use ws_tetris_types::Direction;
//!
//! let mut engine = Engine::new(12345);
//! assert_eq!(engine.state().level, 1);
//!
//! engine.move_piece(Direction::Left);
//! engine.move_piece(Direction::Rotate);
//!
//! // Gravity: one row per tick until the piece lands and locks.
//! while engine.tick() {}
//! assert!(engine.state().board.cells().iter().any(|&c| c != 0));
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use ws_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{Engine, GameState};
pub use pieces::{shape_of, Piece, PieceShape};
pub use rng::PieceRng;
pub use scoring::{level_for_lines, line_clear_points, tick_interval_for_level};
