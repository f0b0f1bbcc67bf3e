//! HTTP server - WebSocket endpoint and static client
//!
//! `/ws?session=<id>` upgrades to a game session; every other path is served
//! from the static directory. Uses axum on tokio.

use std::future::Future;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use derive_more::{Display, Error};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;

use ws_tetris_core::Engine;

use crate::registry::{RegistryError, SessionLease, SessionRegistry};
use crate::session::GameSession;
use crate::transport::WsTransport;

/// Lowest port `start` accepts
pub const MIN_PORT: u16 = 1024;
/// Highest port `start` accepts (end of the registered range)
pub const MAX_PORT: u16 = 49151;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("./static"),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TETRIS_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("TETRIS_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let static_dir = env::var("TETRIS_STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self {
            host,
            port,
            static_dir,
        }
    }

    /// Resolve `host:port`; hostnames are looked up
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("{} did not resolve to any address", self.host))
    }
}

#[derive(Debug, Display, Error)]
pub enum StartupError {
    #[display("port {port} is outside the allowed range 1024..=49151")]
    PortOutOfRange { port: u16 },
    #[display("port {port} is not available: {source}")]
    PortUnavailable { port: u16, source: std::io::Error },
    #[display("only single-player games are supported (requested {players} players)")]
    UnsupportedPlayers { players: u32 },
}

pub fn validate_port(port: u16) -> Result<(), StartupError> {
    if (MIN_PORT..=MAX_PORT).contains(&port) {
        Ok(())
    } else {
        Err(StartupError::PortOutOfRange { port })
    }
}

/// Bind and immediately release `host:port` to see whether it is free
pub fn check_port_available(host: &str, port: u16) -> Result<(), StartupError> {
    std::net::TcpListener::bind((host, port))
        .map(drop)
        .map_err(|source| StartupError::PortUnavailable { port, source })
}

pub fn validate_players(players: u32) -> Result<(), StartupError> {
    if players == 1 {
        Ok(())
    } else {
        Err(StartupError::UnsupportedPlayers { players })
    }
}

/// All checks `start` runs before accepting connections
pub fn check_startup(config: &ServerConfig, players: u32) -> Result<(), StartupError> {
    validate_port(config.port)?;
    check_port_available(&config.host, config.port)?;
    validate_players(players)
}

#[derive(Clone)]
struct AppState {
    registry: SessionRegistry,
}

#[derive(Debug, Deserialize)]
struct WsParams {
    session: Option<String>,
}

/// Routes: `/ws` plus static files for everything else
pub fn router(registry: SessionRegistry, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .with_state(AppState { registry })
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> Response {
    let requested = params
        .session
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let lease = match requested {
        None => state.registry.register_anonymous(),
        Some(id) => match SessionRegistry::validate_id(id).and_then(|_| state.registry.register(id)) {
            Ok(lease) => lease,
            Err(e @ RegistryError::Duplicate { .. }) => {
                eprintln!("[Server] rejected connection: {}", e);
                return (StatusCode::CONFLICT, e.to_string()).into_response();
            }
            Err(e @ RegistryError::InvalidId { .. }) => {
                eprintln!("[Server] rejected connection: {}", e);
                return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
            }
        },
    };

    ws.on_upgrade(move |socket| serve_session(socket, lease))
}

async fn serve_session(socket: WebSocket, lease: SessionLease) {
    let session = GameSession::new(
        lease.id(),
        Engine::with_random_seed(),
        WsTransport::new(socket),
    );
    session.run(lease.cancel_signal()).await;
    // Lease drops here and frees the id.
}

/// Run the server until `shutdown` resolves
///
/// Sends the bound address on `ready_tx` once listening. On shutdown every
/// live session is cancelled.
pub async fn run_server<F>(
    config: ServerConfig,
    registry: SessionRegistry,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    println!("[Server] listening on http://{}", bound);
    println!("[Server] serving static files from {}", config.static_dir.display());
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let app = router(registry.clone(), &config.static_dir);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let cancelled = registry.cancel_all();
            println!("[Server] shutting down, cancelled {} session(s)", cancelled);
        })
        .await
        .context("server error")?;

    Ok(())
}
