//! Time server
//!
//! Accepts WebSocket upgrades on a single path and answers every JSON
//! request with the server's local time.

use anyhow::{Context, Result};
use chrono::Local;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Reply sent for every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTimeReply {
    pub server_time: String,
}

impl ServerTimeReply {
    /// Current local time, e.g. `2024-05-01 12:00:00.123456789 +0200`
    pub fn now() -> Self {
        Self {
            server_time: Local::now().format("%Y-%m-%d %H:%M:%S%.f %z").to_string(),
        }
    }
}

/// WebSocket server answering with the current time
pub struct TimeServer {
    listener: TcpListener,
    path: Arc<str>,
}

impl TimeServer {
    /// Bind to `addr`, accepting upgrades only on `path`
    pub async fn bind(addr: impl ToSocketAddrs, path: impl Into<String>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .context("Failed to bind time server")?;
        let path: String = path.into();

        Ok(Self {
            listener,
            path: Arc::from(path),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// URL clients should connect to
    pub fn ws_url(&self) -> Result<String> {
        Ok(format!("ws://{}{}", self.local_addr()?, self.path))
    }

    /// Accept connections until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Time server listening on {}", self.ws_url()?);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let path = Arc::clone(&self.path);
                            tokio::spawn(async move {
                                serve_connection(stream, peer, path).await;
                            });
                        }
                        Err(e) => {
                            warn!("Accept error: {}", e);
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("Time server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Serve one client until it disconnects or sends something that is not JSON
async fn serve_connection(stream: TcpStream, peer: SocketAddr, path: Arc<str>) {
    let check_path = {
        let path = Arc::clone(&path);
        move |request: &Request, response: Response| -> std::result::Result<Response, ErrorResponse> {
            if request.uri().path() == &*path {
                Ok(response)
            } else {
                let mut rejection = ErrorResponse::new(Some("not found".to_string()));
                *rejection.status_mut() = StatusCode::NOT_FOUND;
                Err(rejection)
            }
        }
    };

    let ws_stream = match accept_hdr_async(stream, check_path).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!("Handshake with {} failed: {}", peer, e);
            return;
        }
    };
    debug!("Client {} connected on {}", peer, path);

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("read: {}", e);
                return;
            }
        };

        let request = match &msg {
            Message::Text(text) => serde_json::from_str::<serde_json::Value>(text),
            Message::Binary(data) => serde_json::from_slice::<serde_json::Value>(data),
            // Keep reading so the close reply is flushed
            Message::Close(_) => continue,
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        };

        let request = match request {
            Ok(value) => value,
            Err(e) => {
                warn!("read: {}", e);
                let _ = write.send(Message::Close(None)).await;
                return;
            }
        };
        info!("req: {}", request);

        let reply = match serde_json::to_string(&ServerTimeReply::now()) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("write: {}", e);
                return;
            }
        };
        if let Err(e) = write.send(Message::Text(reply)).await {
            warn!("write: {}", e);
            return;
        }
    }

    debug!("Client {} disconnected", peer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_shape() {
        let reply = ServerTimeReply::now();
        let json: serde_json::Value = serde_json::to_value(&reply).unwrap();

        assert!(json["server_time"].is_string());
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bind_reports_url() {
        let server = TimeServer::bind("127.0.0.1:0", "/ws_server").await.unwrap();
        let url = server.ws_url().unwrap();

        assert!(url.starts_with("ws://127.0.0.1:"));
        assert!(url.ends_with("/ws_server"));
    }
}
