//! Fan-out broadcaster shared by every use case that talks to the room.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Origin, SessionRepository};

/// Delivers a message to every live session except the origin.
///
/// Delivery is best-effort: a failing recipient is logged and skipped, and
/// its own connection handler cleans it up on its next read.
pub struct Broadcaster {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl Broadcaster {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Send `message` to every session but `origin`'s, echoing it on the
    /// server console. Returns the number of targeted sessions.
    pub async fn broadcast(&self, origin: Origin, message: &str) -> usize {
        let targets: Vec<ConnectionId> = self
            .repository
            .all()
            .await
            .into_iter()
            .map(|(id, _)| id)
            .filter(|id| !origin.excludes(*id))
            .collect();
        let target_count = targets.len();

        if let Err(e) = self.message_pusher.broadcast(targets, message).await {
            tracing::warn!("Broadcast failed: {}", e);
        }
        tracing::info!("[CHAT]: {}", message);

        target_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, Outbound, Session, SessionRegistry},
        infrastructure::{
            message_pusher::TcpMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use std::{collections::HashMap, net::SocketAddr};
    use tokio::sync::{Mutex, mpsc};

    struct Fixture {
        broadcaster: Broadcaster,
        receivers: Vec<mpsc::UnboundedReceiver<Outbound>>,
    }

    async fn fixture(names: &[&str]) -> Fixture {
        let repository = Arc::new(InMemorySessionRepository::new(Arc::new(Mutex::new(
            SessionRegistry::new(),
        ))));
        let pusher = Arc::new(TcpMessagePusher::new(Arc::new(Mutex::new(HashMap::new()))));
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();

        let mut receivers = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let id = ConnectionId::new(i as u64 + 1);
            let name = DisplayName::new(name.to_string()).unwrap();
            repository
                .admit(Session::new(id, name, peer, 1000))
                .await
                .unwrap();
            let (tx, rx) = mpsc::unbounded_channel();
            pusher.register_client(id, tx).await;
            receivers.push(rx);
        }

        Fixture {
            broadcaster: Broadcaster::new(repository, pusher),
            receivers,
        }
    }

    #[tokio::test]
    async fn test_broadcast_skips_sender() {
        // テスト項目: 送信者自身にはメッセージが届かない
        // given (前提条件):
        let mut f = fixture(&["alice", "bob", "carol"]).await;

        // when (操作):
        let targeted = f
            .broadcaster
            .broadcast(Origin::Connection(ConnectionId::new(1)), "[alice] hi")
            .await;

        // then (期待する結果):
        assert_eq!(targeted, 2);
        assert!(f.receivers[0].try_recv().is_err());
        let expected = Outbound::Text("[alice] hi".to_string());
        assert_eq!(f.receivers[1].try_recv().unwrap(), expected);
        assert_eq!(f.receivers[2].try_recv().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_server_broadcast_reaches_everyone() {
        // テスト項目: サーバーからの通知は全員に届く
        // given (前提条件):
        let mut f = fixture(&["alice", "bob"]).await;

        // when (操作):
        let targeted = f
            .broadcaster
            .broadcast(Origin::Server, "[SERVER] hello")
            .await;

        // then (期待する結果):
        assert_eq!(targeted, 2);
        for rx in f.receivers.iter_mut() {
            assert_eq!(
                rx.try_recv().unwrap(),
                Outbound::Text("[SERVER] hello".to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_broadcast_with_no_sessions() {
        // テスト項目: セッションが無くてもエラーにならない
        // given (前提条件):
        let f = fixture(&[]).await;

        // when (操作):
        let targeted = f.broadcaster.broadcast(Origin::Server, "anyone?").await;

        // then (期待する結果):
        assert_eq!(targeted, 0);
    }
}
