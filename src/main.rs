//! WebSocket Tetris server (default binary).
//!
//! `ws-tetris start` serves the browser client and one game per WebSocket
//! connection until Ctrl-C.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ws_tetris::server::{check_startup, run_server, ServerConfig, SessionRegistry};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Start the game server
    Start {
        /// Port to listen on (1024-49151); defaults to TETRIS_PORT or 8080
        #[arg(short, long)]
        port: Option<u16>,
        /// Number of players (only 1 is supported)
        #[arg(short = 'n', long, default_value_t = 1)]
        players: u32,
        /// Address to bind; defaults to TETRIS_HOST or 0.0.0.0
        #[arg(long)]
        host: Option<String>,
        /// Directory with the browser client; defaults to TETRIS_STATIC_DIR or ./static
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("ws-tetris version: {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Start {
            port,
            players,
            host,
            static_dir,
        } => {
            let mut config = ServerConfig::from_env();
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(dir) = static_dir {
                config.static_dir = dir;
            }

            check_startup(&config, players)?;

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    eprintln!("[Server] failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };

            run_server(config, SessionRegistry::new(), None, shutdown).await
        }
    }
}
