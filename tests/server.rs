//! Socket-level lifecycle tests: bind, serve, stop, rebind.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use telegram_relay::ConfigServer;

async fn http_get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_then_stops_and_releases_the_port() {
    let (state, dir) = common::test_state();
    let server = ConfigServer::new(state, Duration::from_secs(5));
    let handle = server.handle();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let serving = tokio::spawn(server.serve(listener));

    let response = http_get(addr, "/api/test").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("Connection test not implemented yet"));

    handle.stop();
    handle.stop(); // stopping twice must not raise
    serving.await.unwrap().unwrap();

    // The socket is released: the same port binds again.
    let rebound = TcpListener::bind(addr).await.unwrap();
    drop(rebound);
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn stop_before_serve_exits_promptly() {
    let (state, dir) = common::test_state();
    let server = ConfigServer::new(state, Duration::from_secs(5));
    let handle = server.handle();
    handle.stop();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(2), server.serve(listener)).await;
    assert!(result.is_ok(), "serve did not observe the early stop");
    result.unwrap().unwrap();
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn bind_conflict_is_reported() {
    let holder = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = holder.local_addr().unwrap();

    // Binding the same port again fails loudly instead of retrying.
    assert!(TcpListener::bind(addr).await.is_err());
    drop(holder);
}
