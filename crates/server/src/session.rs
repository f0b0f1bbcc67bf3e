//! Session - one connection's game
//!
//! A session owns its [`Engine`] and its transport outright and runs as a
//! single task. It waits on one `select!` over cancellation, the next
//! inbound frame and the next gravity tick, and each arm mutates then
//! emits before the loop waits again. Mutations are therefore serialized
//! and snapshots leave in mutation order.

use derive_more::{Display, Error};
use tokio::sync::watch;

use ws_tetris_core::Engine;

use crate::protocol::{self, ClientMessage};
use crate::ticker::TickScheduler;
use crate::transport::{Transport, TransportError};

#[derive(Debug, Display, Error)]
pub enum EmitError {
    #[display("failed to encode state: {source}")]
    Serialize { source: serde_json::Error },
    #[display("failed to send state: {source}")]
    Transport { source: TransportError },
}

/// Why a session stopped
#[derive(Debug, Display)]
pub enum SessionEnd {
    #[display("cancelled")]
    Cancelled,
    #[display("client disconnected")]
    Disconnected,
    #[display("{_0}")]
    Transport(TransportError),
}

#[derive(Debug)]
pub struct GameSession<T> {
    id: String,
    engine: Engine,
    transport: T,
    ticker: TickScheduler,
}

impl<T: Transport> GameSession<T> {
    pub fn new(id: impl Into<String>, engine: Engine, transport: T) -> Self {
        let ticker = TickScheduler::new(engine.tick_interval());
        Self {
            id: id.into(),
            engine,
            transport,
            ticker,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Serialize the current state and push it to the client
    pub async fn emit(&mut self) -> Result<(), EmitError> {
        let text = protocol::encode_state(self.engine.state())
            .map_err(|source| EmitError::Serialize { source })?;
        self.transport
            .send(text)
            .await
            .map_err(|source| EmitError::Transport { source })
    }

    /// Emit, logging and skipping encode failures; transport failures end
    /// the session
    async fn publish(&mut self) -> Result<(), TransportError> {
        match self.emit().await {
            Ok(()) => Ok(()),
            Err(EmitError::Serialize { source }) => {
                eprintln!("[Session {}] skipping update: {}", self.id, source);
                Ok(())
            }
            Err(EmitError::Transport { source }) => Err(source),
        }
    }

    /// Level-ups change the gravity period; pick it up right away
    fn sync_ticker(&mut self) {
        if self.ticker.rearm_if_changed(self.engine.tick_interval()) {
            println!(
                "[Session {}] level {} -> tick {:?}",
                self.id,
                self.engine.state().level,
                self.ticker.period()
            );
        }
    }

    async fn on_tick(&mut self) -> Result<(), TransportError> {
        self.engine.tick();
        self.sync_ticker();
        self.publish().await
    }

    async fn on_frame(&mut self, text: &str) -> Result<(), TransportError> {
        match protocol::parse_message(text) {
            Ok(ClientMessage::Move(direction)) => {
                if self.engine.is_game_over() {
                    return Ok(());
                }
                self.engine.move_piece(direction);
                self.sync_ticker();
                self.publish().await
            }
            Ok(ClientMessage::NewGame) => {
                self.engine.reset();
                self.ticker.rearm(self.engine.tick_interval());
                self.publish().await
            }
            Ok(ClientMessage::Unknown(msg_type)) => {
                println!("[Session {}] ignoring message type '{}'", self.id, msg_type);
                Ok(())
            }
            Err(e) => {
                eprintln!("[Session {}] JSON error: {}", self.id, e);
                Ok(())
            }
        }
    }

    /// Drive the session until the client leaves, the transport fails or
    /// `cancel` fires
    ///
    /// Sends the initial snapshot first. A closed cancel channel counts as
    /// cancellation.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) -> SessionEnd {
        println!(
            "[Session {}] started (seed {})",
            self.id,
            self.engine.seed()
        );

        let end = 'session: {
            if *cancel.borrow_and_update() {
                break 'session SessionEnd::Cancelled;
            }
            if let Err(e) = self.publish().await {
                break 'session SessionEnd::Transport(e);
            }

            loop {
                let playing = !self.engine.is_game_over();

                tokio::select! {
                    changed = cancel.changed() => {
                        if changed.is_err() || *cancel.borrow_and_update() {
                            break SessionEnd::Cancelled;
                        }
                    }
                    frame = self.transport.recv() => match frame {
                        None => break SessionEnd::Disconnected,
                        Some(Err(e)) => break SessionEnd::Transport(e),
                        Some(Ok(text)) => {
                            if let Err(e) = self.on_frame(&text).await {
                                break SessionEnd::Transport(e);
                            }
                        }
                    },
                    _ = self.ticker.tick(), if playing => {
                        if let Err(e) = self.on_tick().await {
                            break SessionEnd::Transport(e);
                        }
                    }
                }
            }
        };

        println!(
            "[Session {}] closed: {} (score {}, level {})",
            self.id,
            end,
            self.engine.state().score,
            self.engine.state().level
        );
        end
    }
}
