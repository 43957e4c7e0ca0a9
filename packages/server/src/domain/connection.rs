//! Connection identity.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate the next connection id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Who a broadcast comes from.
///
/// The server itself has no connection, so it can never be registered as a
/// session and is never a fan-out target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Server,
    Connection(ConnectionId),
}

impl Origin {
    /// Whether a broadcast from this origin must skip `connection_id`.
    pub fn excludes(&self, connection_id: ConnectionId) -> bool {
        matches!(self, Origin::Connection(sender) if *sender == connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_connection_ids_are_unique() {
        // テスト項目: 採番された接続 ID は重複しない
        // given (前提条件):

        // when (操作):
        let first = ConnectionId::next();
        let second = ConnectionId::next();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(second.value() > first.value());
    }

    #[test]
    fn test_origin_excludes_only_its_own_connection() {
        // テスト項目: 送信元の接続だけが除外される
        // given (前提条件):
        let alice = ConnectionId::new(1);
        let bob = ConnectionId::new(2);

        // when (操作):
        let from_alice = Origin::Connection(alice);

        // then (期待する結果):
        assert!(from_alice.excludes(alice));
        assert!(!from_alice.excludes(bob));
        assert!(!Origin::Server.excludes(alice));
    }
}
