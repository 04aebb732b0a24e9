//! Shared helpers for integration tests: SSE fixtures and mock servers
#![allow(dead_code)]

use futures_util::StreamExt;
use llm_arena::{FragmentStream, LlmError};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::ResponseTemplate;

pub fn fixtures_dir(provider: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(provider)
}

/// Read a `.sse` fixture verbatim
pub fn load_fixture(provider: &str, name: &str) -> String {
    let path = fixtures_dir(provider).join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// `200 OK` with an event-stream body
pub fn sse_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/event-stream")
}

/// Drain a fragment stream
pub async fn collect_fragments(stream: FragmentStream) -> Vec<Result<String, LlmError>> {
    stream.collect().await
}

/// Split collected items into text and the terminal error, asserting the error is last
pub fn split_terminal_error(
    items: Vec<Result<String, LlmError>>,
) -> (Vec<String>, Option<LlmError>) {
    let mut texts = Vec::new();
    let mut error = None;
    for item in items {
        assert!(error.is_none(), "item after terminal error");
        match item {
            Ok(text) => {
                assert!(!text.is_empty(), "empty fragment yielded");
                texts.push(text);
            }
            Err(e) => error = Some(e),
        }
    }
    (texts, error)
}

/// Serve a single request whose body promises more bytes than it sends.
///
/// The connection is closed right after `body`, so the client sees the
/// response break off partway through. Returns the server's base URL.
pub async fn truncated_sse_server(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ncontent-length: {}\r\n\r\n",
            body.len() + 1024
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
    });
    format!("http://{addr}")
}

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                return;
            }
        }
    }
}
