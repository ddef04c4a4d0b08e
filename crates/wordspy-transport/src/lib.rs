//! Transport layer: accepting sockets, framing bytes, and the broadcast
//! groups the game core publishes snapshots through.
//!
//! The [`Transport`] and [`Connection`] traits keep the rest of the
//! server independent of the concrete socket library; [`Hub`] provides
//! the non-blocking send primitives that room actors call from inside
//! their closures.

#![allow(async_fn_in_trait)]

mod error;
mod hub;
mod websocket;

pub use error::TransportError;
pub use hub::{Hub, Outbound};
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, TransportError>;
}

/// A single bidirectional connection carrying byte frames.
pub trait Connection: Send + Sync + 'static {
    /// Sends one frame to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Receives the next frame. `Ok(None)` means a clean close.
    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), TransportError>;

    /// The unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
