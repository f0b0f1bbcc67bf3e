//! Server crate - plays Tetris sessions over WebSocket
//!
//! Each browser connection gets its own game. The server owns the state;
//! the client only renders snapshots and forwards keys.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: client opens `GET /ws?session=<id>` (id optional)
//! 2. **Snapshot**: server immediately sends `state_update`
//! 3. **Input**: client sends `move` / `new_game`; each accepted message is
//!    answered with a fresh `state_update`
//! 4. **Gravity**: the server ticks the piece down on its own at the level's
//!    interval and sends a `state_update` each time
//!
//! ## Client → Server
//!
//! - **move**: `{"type":"move","payload":0}` (0 left, 1 right, 2 down,
//!   3 rotate; names also accepted)
//! - **new_game**: `{"type":"new_game"}`
//!
//! ## Server → Client
//!
//! - **state_update**: board, current and next piece, score, level, lines,
//!   game-over flag
//!
//! # Environment Variables
//!
//! - `TETRIS_HOST`: listen address (default: 0.0.0.0)
//! - `TETRIS_PORT`: listen port (default: 8080)
//! - `TETRIS_STATIC_DIR`: directory with the browser client (default: ./static)

pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod ticker;
pub mod transport;

pub use protocol::{encode_state, parse_message, ClientMessage, ParseError, StateUpdateMessage};
pub use registry::{RegistryError, SessionLease, SessionRegistry};
pub use server::{check_startup, router, run_server, ServerConfig, StartupError};
pub use session::{EmitError, GameSession, SessionEnd};
pub use ticker::TickScheduler;
pub use transport::{ChannelClient, ChannelTransport, Transport, TransportError, WsTransport};
