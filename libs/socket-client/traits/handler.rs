use crate::error::{Result, TransportError};
use crate::message::{CloseEvent, OutboundMessage, WsMessage};
use crate::sink::{LogSink, TracingSink};
use serde::Serialize;
use std::sync::Arc;

/// Lifecycle callbacks for a single connection
///
/// The client invokes these from its connection task one at a time, so
/// implementations never run concurrently with each other and may keep
/// plain mutable state.
pub trait SocketHandler: Send + 'static {
    /// Called once with the fixed endpoint, before any other callback
    fn on_connecting(&mut self, _endpoint: &str) {}

    /// Sink receiving the `closed websocket` line on every teardown call
    ///
    /// Queried once when the client is created.
    fn teardown_sink(&self) -> Arc<dyn LogSink> {
        Arc::new(TracingSink)
    }

    /// Called exactly once when the transport becomes ready
    ///
    /// Messages queued on `outbox` are written right after this returns.
    fn on_open(&mut self, _endpoint: &str, _outbox: &mut Outbox) -> Result<()> {
        Ok(())
    }

    /// Called once per inbound payload, in arrival order
    fn on_message(&mut self, _message: &WsMessage) {}

    /// Called exactly once when the connection terminates
    fn on_close(&mut self, _event: &CloseEvent) {}

    /// Called zero or more times on transport errors
    fn on_error(&mut self, _error: &TransportError) {}
}

/// Messages queued by `SocketHandler::on_open`
#[derive(Debug, Default)]
pub struct Outbox {
    queued: Vec<WsMessage>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, message: WsMessage) {
        self.queued.push(message);
    }

    /// Serialize `value` to JSON text and queue it
    pub fn send_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.queued.push(WsMessage::Text(text));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, WsMessage> {
        self.queued.drain(..)
    }
}

/// Asks the server for its time on open and logs everything else
///
/// Log lines:
/// - `connected to <endpoint>` / `send: <greeting>` on open
/// - `receive: <payload>` per message
/// - `connection closed (<endpoint> : <code>,<reason>)` on close
/// - `<name>=<value>` per error property
pub struct ServerTimeHandler<S: LogSink> {
    sink: Arc<S>,
    greeting: String,
    endpoint: String,
}

impl<S: LogSink> ServerTimeHandler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
            greeting: crate::core::config::DEFAULT_GREETING.to_string(),
            endpoint: String::new(),
        }
    }

    /// Replace the `testsend` text sent on open
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: LogSink> SocketHandler for ServerTimeHandler<S> {
    fn on_connecting(&mut self, endpoint: &str) {
        self.endpoint = endpoint.to_string();
    }

    fn teardown_sink(&self) -> Arc<dyn LogSink> {
        self.sink.clone()
    }

    fn on_open(&mut self, endpoint: &str, outbox: &mut Outbox) -> Result<()> {
        self.sink.line(&format!("connected to {}", endpoint));

        outbox.send_json(&OutboundMessage::new(self.greeting.as_str()))?;
        self.sink.line(&format!("send: {}", self.greeting));
        Ok(())
    }

    fn on_message(&mut self, message: &WsMessage) {
        match message {
            WsMessage::Text(text) => self.sink.line(&format!("receive: {}", text)),
            WsMessage::Binary(data) => self
                .sink
                .line(&format!("receive: <binary {} bytes>", data.len())),
        }
    }

    fn on_close(&mut self, event: &CloseEvent) {
        self.sink.line(&format!(
            "connection closed ({} : {},{})",
            self.endpoint, event.code, event.reason
        ));
    }

    fn on_error(&mut self, error: &TransportError) {
        for (name, value) in error.properties() {
            self.sink.line(&format!("{}={}", name, value));
        }
    }
}
