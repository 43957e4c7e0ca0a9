//! Session entity.

use std::net::SocketAddr;

use super::{ConnectionId, DisplayName};

/// A live association between one connection and its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub name: DisplayName,
    /// Remote endpoint of the connection
    pub peer: SocketAddr,
    /// Unix timestamp of admission (milliseconds)
    pub connected_at: i64,
}

impl Session {
    pub fn new(
        connection_id: ConnectionId,
        name: DisplayName,
        peer: SocketAddr,
        connected_at: i64,
    ) -> Self {
        Self {
            connection_id,
            name,
            peer,
            connected_at,
        }
    }
}
