use crate::error::ChannelError;
use netprobe_model::Report;
use std::net::TcpStream;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// Write half of an established telemetry connection.
pub trait MessageSink: Send {
    /// Writes one complete text message.
    fn write_text(&mut self, message: String) -> Result<(), ChannelError>;
}

/// Dials the telemetry endpoint.
pub trait Connector: Send + Sync {
    fn endpoint(&self) -> &str;

    fn dial(&self) -> Result<Box<dyn MessageSink>, ChannelError>;
}

type Connection = Arc<Mutex<Box<dyn MessageSink>>>;

/// The single outbound telemetry connection shared by every probe task.
///
/// The handle may be absent. [`send`](Self::send) never dials; a caller that
/// gets an error is expected to call [`reconnect`](Self::reconnect).
pub struct TelemetryChannel {
    connector: Box<dyn Connector>,
    handle: RwLock<Option<Connection>>,
}

impl TelemetryChannel {
    /// Creates a disconnected channel.
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            handle: RwLock::new(None),
        }
    }

    pub fn websocket(endpoint: impl Into<String>) -> Self {
        Self::new(WebSocketConnector::new(endpoint))
    }

    pub fn endpoint(&self) -> &str {
        self.connector.endpoint()
    }

    pub fn is_connected(&self) -> bool {
        self.current().is_some()
    }

    /// Dials once and replaces the handle with the result. On failure the
    /// handle is left absent.
    pub fn connect(&self) -> Result<(), ChannelError> {
        log::info!("connecting to telemetry endpoint {}", self.endpoint());

        let dialed = self.connector.dial();
        let mut handle = self.handle.write().unwrap_or_else(PoisonError::into_inner);

        match dialed {
            Ok(sink) => {
                *handle = Some(Arc::new(Mutex::new(sink)));
                log::info!("connected to telemetry endpoint {}", self.endpoint());
                Ok(())
            }
            Err(err) => {
                *handle = None;
                log::warn!("telemetry connection failed: {err}");
                Err(err)
            }
        }
    }

    pub fn reconnect(&self) -> Result<(), ChannelError> {
        self.connect()
    }

    /// Writes `report` as one JSON message.
    pub fn send(&self, report: &Report) -> Result<(), ChannelError> {
        let connection = self.current().ok_or(ChannelError::ConnectionDown)?;
        let message = report.to_message()?;

        log::debug!("writing {} report for {}", report.kind(), report.target());
        let mut sink = connection.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_text(message)
    }

    fn current(&self) -> Option<Connection> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for TelemetryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryChannel")
            .field("endpoint", &self.endpoint())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    endpoint: String,
}

impl WebSocketConnector {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Connector for WebSocketConnector {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn dial(&self) -> Result<Box<dyn MessageSink>, ChannelError> {
        let (socket, response) =
            tungstenite::connect(self.endpoint.as_str()).map_err(|err| ChannelError::Dial {
                endpoint: self.endpoint.clone(),
                reason: err.to_string(),
            })?;

        log::debug!("websocket handshake status: {}", response.status());
        Ok(Box::new(WebSocketSink { socket }))
    }
}

struct WebSocketSink {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
}

impl MessageSink for WebSocketSink {
    fn write_text(&mut self, message: String) -> Result<(), ChannelError> {
        self.socket
            .send(Message::Text(message))
            .map_err(|err| ChannelError::Write(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RefusingConnector;

    impl Connector for RefusingConnector {
        fn endpoint(&self) -> &str {
            "ws://127.0.0.1:9/telemetry"
        }

        fn dial(&self) -> Result<Box<dyn MessageSink>, ChannelError> {
            Err(ChannelError::Dial {
                endpoint: self.endpoint().to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn starts_disconnected() {
        let channel = TelemetryChannel::new(RefusingConnector);
        assert!(!channel.is_connected());
        assert_eq!(channel.endpoint(), "ws://127.0.0.1:9/telemetry");
    }

    #[test]
    fn failed_dial_leaves_handle_absent() {
        let channel = TelemetryChannel::new(RefusingConnector);
        let err = channel.connect().unwrap_err();
        assert!(matches!(err, ChannelError::Dial { .. }));
        assert!(!channel.is_connected());
    }

    #[test]
    fn websocket_dial_to_closed_port_fails() {
        let channel = TelemetryChannel::websocket("ws://127.0.0.1:1/telemetry");
        assert!(channel.connect().is_err());
        assert!(!channel.is_connected());
    }
}
