use crate::config::ClientConfig;
use crate::connection_state::{AtomicConnectionState, ConnectionState};
use crate::traits::*;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Internal command messages for client control
#[derive(Debug)]
enum ClientCommand {
    /// Close the connection (or abandon the attempt)
    Close,
}

/// Cloneable teardown handle for a SocketClient
///
/// Lets process-exit hooks close the connection without owning the client.
#[derive(Clone)]
pub struct CloseHandle {
    command_tx: UnboundedSender<ClientCommand>,
    state: Arc<AtomicConnectionState>,
    sink: Arc<dyn LogSink>,
}

impl CloseHandle {
    /// Request shutdown of the connection, then log `closed websocket`
    ///
    /// Safe in every state. The shutdown request goes out at most once;
    /// the confirmation line is logged on every call.
    pub fn close(&self) {
        self.request_close();
        self.sink.line("closed websocket");
    }

    /// Send the close command unless close was already requested or the
    /// connection has ended
    ///
    /// Returns whether a command was sent.
    fn request_close(&self) -> bool {
        let previous = self.state.begin_closing();
        match previous {
            ConnectionState::Closing | ConnectionState::Closed => {
                debug!("Close requested while {:?}, nothing to send", previous);
                false
            }
            ConnectionState::Connecting | ConnectionState::Open => {
                // The task may already be gone; nothing left to close then.
                let _ = self.command_tx.send(ClientCommand::Close);
                true
            }
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }
}

/// WebSocket client owning a single connection to a fixed endpoint
///
/// The connection runs on a dedicated tokio task and reports everything
/// through the [`SocketHandler`] passed to [`SocketClient::connect`]. There is
/// no reconnection: once the connection ends, `on_close` has fired and the
/// client is done.
///
/// Dropping the client closes a connection that is still connecting or
/// open, without logging.
pub struct SocketClient {
    config: ClientConfig,
    state: Arc<AtomicConnectionState>,
    close_handle: CloseHandle,
    task_handle: Option<tokio::task::JoinHandle<()>>,
}

impl SocketClient {
    /// Start connecting to `config.endpoint`
    ///
    /// Returns immediately; success or failure is reported only through the
    /// handler. Must be called from within a tokio runtime.
    pub fn connect<H>(config: ClientConfig, handler: H) -> Self
    where
        H: SocketHandler,
    {
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Connecting));
        let (command_tx, command_rx) = unbounded_channel();
        let sink = handler.teardown_sink();

        let task_handle = {
            let endpoint = config.endpoint.clone();
            let state = Arc::clone(&state);

            tokio::spawn(async move {
                run_client(endpoint, handler, state, command_rx).await;
            })
        };

        let close_handle = CloseHandle {
            command_tx,
            state: Arc::clone(&state),
            sink,
        };

        Self {
            config,
            state,
            close_handle,
            task_handle: Some(task_handle),
        }
    }

    /// Connect to `endpoint` with the default greeting
    pub fn connect_to<H>(endpoint: impl Into<String>, handler: H) -> Self
    where
        H: SocketHandler,
    {
        Self::connect(ClientConfig::new(endpoint), handler)
    }

    pub fn endpoint(&self) -> &str {
        self.config.endpoint()
    }

    /// Get current connection state
    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Request shutdown of the connection, see [`CloseHandle::close`]
    pub fn close(&self) {
        self.close_handle.close();
    }

    /// Handle that can close this client from elsewhere
    pub fn close_handle(&self) -> CloseHandle {
        self.close_handle.clone()
    }

    /// Whether the connection task has finished
    pub fn is_finished(&self) -> bool {
        self.task_handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Wait until the connection task has finished
    ///
    /// By then `on_close` has been called. Cancel-safe.
    pub async fn wait(&mut self) -> Result<()> {
        if let Some(handle) = self.task_handle.as_mut() {
            let joined = handle.await;
            self.task_handle = None;
            joined.map_err(|e| SocketError::Other(format!("Client task failed: {}", e)))?;
        }
        Ok(())
    }
}

impl Drop for SocketClient {
    fn drop(&mut self) {
        if self.close_handle.request_close() {
            debug!("SocketClient dropped, closing {}", self.config.endpoint());
        }
    }
}

/// Connection task: connect, run the session, report close exactly once
async fn run_client<H>(
    endpoint: String,
    mut handler: H,
    state: Arc<AtomicConnectionState>,
    mut command_rx: UnboundedReceiver<ClientCommand>,
) where
    H: SocketHandler,
{
    handler.on_connecting(&endpoint);
    debug!("Connecting to {}", endpoint);

    let attempt = tokio::select! {
        result = connect_async(endpoint.as_str()) => Some(result),
        // Close command or every handle dropped
        _ = command_rx.recv() => None,
    };

    let close_event = match attempt {
        None => {
            debug!("Close requested before the connection opened");
            handler.on_error(&TransportError::closed_before_open());
            CloseEvent::abnormal()
        }
        Some(Err(e)) => {
            error!("Failed to connect to {}: {}", endpoint, e);
            handler.on_error(&TransportError::from(&e));
            CloseEvent::abnormal()
        }
        Some(Ok((mut ws_stream, _))) => {
            if state.try_open() {
                info!("Connected to {}", endpoint);
                handle_connection(ws_stream, &endpoint, &mut handler, &state, &mut command_rx).await
            } else {
                debug!("Close requested while the handshake completed, dropping connection");
                let _ = ws_stream.close(None).await;
                handler.on_error(&TransportError::closed_before_open());
                CloseEvent::abnormal()
            }
        }
    };

    state.set(ConnectionState::Closed);
    debug!(code = close_event.code, reason = %close_event.reason, "Connection closed");
    handler.on_close(&close_event);
}

/// Drive an open connection until it terminates
///
/// Returns the close event to report.
async fn handle_connection<H>(
    ws_stream: WsStream,
    endpoint: &str,
    handler: &mut H,
    state: &AtomicConnectionState,
    command_rx: &mut UnboundedReceiver<ClientCommand>,
) -> CloseEvent
where
    H: SocketHandler,
{
    let (mut write, mut read) = ws_stream.split();

    let mut outbox = Outbox::new();
    if let Err(e) = handler.on_open(endpoint, &mut outbox) {
        error!("Open handler failed: {}", e);
    }

    // Nothing leaves the client once close has been requested.
    if state.is_closing() {
        debug!("Close requested during open, discarding {} queued messages", outbox.len());
    } else {
        for msg in outbox.drain() {
            if let Err(e) = write.send(ws_message_to_tungstenite(msg)).await {
                error!("Failed to send message: {}", e);
                handler.on_error(&TransportError::from(&e));
                break;
            }
        }
    }

    let mut received_close: Option<CloseEvent> = None;
    let mut close_sent = false;

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Close(frame))) => {
                        let event = frame
                            .map(|f| CloseEvent::new(u16::from(f.code), f.reason.to_string()))
                            .unwrap_or_else(CloseEvent::no_status);
                        debug!("Received close frame: {:?}", event);
                        state.begin_closing();
                        received_close = Some(event);
                    }
                    Some(Ok(msg)) => {
                        if let Some(ws_msg) = tungstenite_to_ws_message(msg) {
                            handler.on_message(&ws_msg);
                        }
                    }
                    Some(Err(tungstenite::Error::ConnectionClosed))
                    | Some(Err(tungstenite::Error::AlreadyClosed)) => break,
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        handler.on_error(&TransportError::from(&e));
                        break;
                    }
                    None => break,
                }
            }

            _ = command_rx.recv(), if !close_sent && received_close.is_none() => {
                close_sent = true;
                let frame = CloseFrame {
                    code: CloseCode::Normal,
                    reason: "".into(),
                };
                if let Err(e) = write.send(Message::Close(Some(frame))).await {
                    warn!("Failed to send close frame: {}", e);
                    handler.on_error(&TransportError::from(&e));
                    break;
                }
            }
        }
    }

    if received_close.is_none() {
        warn!("WebSocket stream ended without a close frame");
    }
    received_close.unwrap_or_else(CloseEvent::abnormal)
}

/// Convert WsMessage to tungstenite Message
fn ws_message_to_tungstenite(msg: WsMessage) -> Message {
    match msg {
        WsMessage::Text(text) => Message::Text(text),
        WsMessage::Binary(data) => Message::Binary(data),
    }
}

/// Convert tungstenite Message to WsMessage
fn tungstenite_to_ws_message(msg: Message) -> Option<WsMessage> {
    match msg {
        Message::Text(text) => Some(WsMessage::Text(text)),
        Message::Binary(data) => Some(WsMessage::Binary(data)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}
