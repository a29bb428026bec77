//! Common test utilities for socket-client integration tests
//!
//! This module provides a scriptable mock WebSocket server.

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// What the mock server does once the first text message arrives
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// Text frames sent back, in order
    pub replies: Vec<String>,
    /// Close frame sent after the replies
    pub close_with: Option<(u16, String)>,
    /// Drop the TCP stream after the replies without a close frame
    pub drop_after_replies: bool,
}

impl MockBehavior {
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn then_close(mut self, code: u16, reason: &str) -> Self {
        self.close_with = Some((code, reason.to_string()));
        self
    }

    pub fn then_drop(mut self) -> Self {
        self.drop_after_replies = true;
        self
    }
}

/// A simple mock WebSocket server for testing
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    received: Arc<Mutex<Vec<String>>>,
    finished: Arc<AtomicUsize>,
}

impl MockWsServer {
    /// Create and start a new mock WebSocket server
    pub async fn start(behavior: MockBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let received = Arc::new(Mutex::new(Vec::new()));
        let finished = Arc::new(AtomicUsize::new(0));

        {
            let shutdown = Arc::clone(&shutdown);
            let received = Arc::clone(&received);
            let finished = Arc::clone(&finished);

            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        result = listener.accept() => {
                            match result {
                                Ok((stream, _)) => {
                                    let behavior = behavior.clone();
                                    let shutdown = Arc::clone(&shutdown);
                                    let received = Arc::clone(&received);
                                    let finished = Arc::clone(&finished);
                                    tokio::spawn(async move {
                                        Self::handle_connection(stream, behavior, shutdown, received).await;
                                        finished.fetch_add(1, Ordering::SeqCst);
                                    });
                                }
                                Err(e) => {
                                    eprintln!("Accept error: {}", e);
                                    break;
                                }
                            }
                        }
                        _ = shutdown.notified() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            addr,
            shutdown,
            received,
            finished,
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        behavior: MockBehavior,
        shutdown: Arc<Notify>,
        received: Arc<Mutex<Vec<String>>>,
    ) {
        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();
        let mut replied = false;

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            received.lock().push(text);
                            if replied {
                                continue;
                            }
                            replied = true;

                            for reply in &behavior.replies {
                                if write.send(Message::Text(reply.clone())).await.is_err() {
                                    return;
                                }
                            }
                            if behavior.drop_after_replies {
                                return;
                            }
                            if let Some((code, reason)) = &behavior.close_with {
                                let frame = CloseFrame {
                                    code: CloseCode::from(*code),
                                    reason: reason.clone().into(),
                                };
                                if write.send(Message::Close(Some(frame))).await.is_err() {
                                    return;
                                }
                            }
                        }
                        // Keep reading so the close reply gets flushed
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => break,
                    }
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws_server", self.addr)
    }

    /// Text frames received so far, across all connections
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    /// Number of connections whose session has ended
    pub fn finished_connections(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Accepts TCP connections but never answers the WebSocket handshake
pub struct SilentServer {
    pub addr: SocketAddr,
    task: tokio::task::JoinHandle<()>,
}

impl SilentServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        Self { addr, task }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws_server", self.addr)
    }
}

impl Drop for SilentServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Address nothing is listening on
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}/ws_server", addr)
}

/// Poll `condition` every 10ms until it holds or `timeout` passes
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
