//! WebSocket Tetris (workspace facade crate).
//!
//! Re-exports the game engine, shared types and the WebSocket server from
//! the crates under `crates/` as `ws_tetris::{core,server,types}`.

pub use ws_tetris_core as core;
pub use ws_tetris_server as server;
pub use ws_tetris_types as types;
