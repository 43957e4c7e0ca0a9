//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者名のプレフィックス付与と送信者以外への配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：他の参加者への配信
//! - 異常系：セッションが既に削除された接続からの送信（キック直後など）

use std::sync::Arc;

use crate::domain::{ConnectionId, Origin, SessionRepository, notice};

use super::{broadcast::Broadcaster, error::SendError};

/// チャットメッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// Broadcaster（全員への配信）
    broadcaster: Arc<Broadcaster>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn SessionRepository>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// 受信したチャンクを送信者以外の全員に配信
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 配信対象の数
    /// * `Err(SendError)` - 送信元のセッションが存在しない
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        content: &str,
    ) -> Result<usize, SendError> {
        let name = self
            .repository
            .lookup(connection_id)
            .await
            .ok_or(SendError::SessionNotFound(connection_id))?;

        let line = notice::chat_line(&name, content);
        Ok(self
            .broadcaster
            .broadcast(Origin::Connection(connection_id), &line)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MessagePusher, Outbound, Session, SessionRegistry},
        infrastructure::{
            message_pusher::TcpMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use std::{collections::HashMap, net::SocketAddr};
    use tokio::sync::{Mutex, mpsc};

    async fn create_usecase_with(
        names: &[&str],
    ) -> (
        SendMessageUseCase,
        Arc<InMemorySessionRepository>,
        Vec<mpsc::UnboundedReceiver<Outbound>>,
    ) {
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

        let broadcaster = Arc::new(Broadcaster::new(repository.clone(), pusher));
        let usecase = SendMessageUseCase::new(repository.clone(), broadcaster);
        (usecase, repository, receivers)
    }

    #[tokio::test]
    async fn test_send_message_is_prefixed_and_relayed() {
        // テスト項目: 送信者名付きで送信者以外に配信される
        // given (前提条件):
        let (usecase, _repo, mut receivers) = create_usecase_with(&["alice", "carol"]).await;

        // when (操作):
        let result = usecase.execute(ConnectionId::new(1), "hi").await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert!(receivers[0].try_recv().is_err());
        assert_eq!(
            receivers[1].try_recv().unwrap(),
            Outbound::Text("[alice] hi".to_string())
        );
    }

    #[tokio::test]
    async fn test_send_message_without_session() {
        // テスト項目: キック済みなどでセッションが無い接続からの送信はエラーになる
        // given (前提条件):
        let (usecase, repo, mut receivers) = create_usecase_with(&["alice", "carol"]).await;
        repo.kick("alice").await.unwrap();

        // when (操作):
        let result = usecase.execute(ConnectionId::new(1), "still here?").await;

        // then (期待する結果): 誰にも配信されない
        assert_eq!(
            result,
            Err(SendError::SessionNotFound(ConnectionId::new(1)))
        );
        assert!(receivers[1].try_recv().is_err());
    }
}
