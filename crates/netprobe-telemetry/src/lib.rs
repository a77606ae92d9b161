//! Telemetry delivery over a single shared WebSocket connection.

pub mod channel;
pub mod error;

pub use channel::{Connector, MessageSink, TelemetryChannel, WebSocketConnector};
pub use error::ChannelError;
