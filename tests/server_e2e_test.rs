//! Server end-to-end tests over a real socket

use std::path::PathBuf;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use ws_tetris::server::{run_server, ServerConfig, SessionRegistry};

struct TestServer {
    addr: std::net::SocketAddr,
    registry: SessionRegistry,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<anyhow::Result<()>>,
}

async fn start_server(static_dir: PathBuf) -> TestServer {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir,
    };
    let registry = SessionRegistry::new();
    let (ready_tx, ready_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_registry = registry.clone();
    let handle = tokio::spawn(async move {
        run_server(config, server_registry, Some(ready_tx), async move {
            let _ = shutdown_rx.await;
        })
        .await
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    TestServer {
        addr,
        registry,
        shutdown: Some(shutdown_tx),
        handle,
    }
}

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn ws_connect(addr: std::net::SocketAddr, path: &str) -> Result<Client, Error> {
    let (ws, _response) = tokio_tungstenite::connect_async(format!("ws://{addr}{path}")).await?;
    Ok(ws)
}

/// HTTP status of a refused upgrade
async fn rejected_status(addr: std::net::SocketAddr, path: &str) -> u16 {
    match ws_connect(addr, path).await {
        Err(Error::Http(response)) => response.status().as_u16(),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("upgrade to {path} should have been refused"),
    }
}

async fn send_text(ws: &mut Client, text: &str) {
    ws.send(Message::Text(text.to_string())).await.unwrap();
}

async fn next_state(ws: &mut Client) -> serde_json::Value {
    let text = tokio::time::timeout(Duration::from_secs(3), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return text,
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("websocket error: {e}"),
                None => panic!("server closed the connection"),
            }
        }
    })
    .await
    .expect("no frame from server");
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["type"], "state_update");
    v
}

async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(3), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached");
}

fn temp_static_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ws-tetris-{}-{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn websocket_session_receives_state_and_moves() {
    let server = start_server(temp_static_dir("moves")).await;
    let mut stream = ws_connect(server.addr, "/ws?session=alice").await.unwrap();

    let first = next_state(&mut stream).await;
    assert_eq!(first["payload"]["score"], 0);
    assert_eq!(first["payload"]["level"], 1);
    let x0 = first["payload"]["current_piece"]["x"].as_i64().unwrap();
    assert!(server.registry.contains("alice"));

    send_text(&mut stream, r#"{"type":"move","payload":0}"#).await;
    // A gravity tick may land first; the move shows up right after.
    let mut moved = false;
    for _ in 0..3 {
        let v = next_state(&mut stream).await;
        if v["payload"]["current_piece"]["x"].as_i64().unwrap() == x0 - 1 {
            moved = true;
            break;
        }
    }
    assert!(moved);

    stream.close(None).await.unwrap();
    let registry = server.registry.clone();
    wait_until(move || !registry.contains("alice")).await;
}

#[tokio::test]
async fn duplicate_and_invalid_session_ids_are_rejected() {
    let server = start_server(temp_static_dir("ids")).await;

    let mut first = ws_connect(server.addr, "/ws?session=bob").await.unwrap();
    next_state(&mut first).await;

    assert_eq!(rejected_status(server.addr, "/ws?session=bob").await, 409);
    assert_eq!(rejected_status(server.addr, "/ws?session=bad%01id").await, 400);
    let long = "x".repeat(65);
    assert_eq!(
        rejected_status(server.addr, &format!("/ws?session={long}")).await,
        400
    );

    let mut anon = ws_connect(server.addr, "/ws").await.unwrap();
    next_state(&mut anon).await;
    assert!(server.registry.ids().iter().any(|id| id.starts_with("anon-")));
}

#[tokio::test]
async fn static_files_are_served() {
    let dir = temp_static_dir("static");
    std::fs::write(dir.join("index.html"), "<html>tetris</html>").unwrap();
    let server = start_server(dir).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    let request = format!(
        "GET /index.html HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        server.addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.ends_with("<html>tetris</html>"));
}

#[tokio::test]
async fn shutdown_cancels_live_sessions() {
    let mut server = start_server(temp_static_dir("shutdown")).await;
    let mut stream = ws_connect(server.addr, "/ws?session=carol").await.unwrap();
    next_state(&mut stream).await;
    assert_eq!(server.registry.len(), 1);

    if let Some(tx) = server.shutdown.take() {
        tx.send(()).unwrap();
    }
    let registry = server.registry.clone();
    wait_until(move || registry.is_empty()).await;

    let result = tokio::time::timeout(Duration::from_secs(3), server.handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
