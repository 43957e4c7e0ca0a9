//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 表示名の検証（予約名・禁止文字・重複・BAN）と登録
//!
//! ### なぜこのテストが必要か
//! - 名前の一意性はここでしか保証されない（登録後は再チェックしない）
//! - 拒否された接続が Repository や MessagePusher に残らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続
//! - 異常系：予約名・禁止文字・重複・BAN 済みの名前での接続試行

use std::{net::SocketAddr, sync::Arc};

use chatter_shared::time::Clock;

use crate::domain::{
    AdmissionError, ConnectionId, DisplayName, MessagePusher, Origin, PusherChannel, Session,
    SessionRepository, notice,
};

use super::broadcast::Broadcaster;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Broadcaster（全員への配信）
    broadcaster: Arc<Broadcaster>,
    /// 接続時刻の取得元
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<Broadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            broadcaster,
            clock,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 接続 ID
    /// * `peer` - 接続元アドレス
    /// * `requested_name` - クライアントが送ってきた表示名（そのまま）
    /// * `sender` - 接続へのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(DisplayName)` - 接続成功
    /// * `Err(AdmissionError)` - 接続拒否（クライアントには理由を伝えない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        peer: SocketAddr,
        requested_name: &str,
        sender: PusherChannel,
    ) -> Result<DisplayName, AdmissionError> {
        // 1. 名前の形式チェック（空・予約名・禁止文字）
        let name = DisplayName::new(requested_name.to_string())?;

        // 2. Repository に登録（重複・BAN チェック）
        let session = Session::new(connection_id, name.clone(), peer, self.clock.now_millis());
        self.repository.admit(session).await?;

        // 3. MessagePusher に送信チャンネルを登録
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        tracing::debug!(
            "{} participant(s) online after admitting '{}'",
            self.repository.count().await,
            name
        );

        Ok(name)
    }

    /// 参加者が接続したことを全員（本人を含む）にブロードキャスト
    pub async fn broadcast_participant_joined(&self, name: &DisplayName) -> usize {
        self.broadcaster
            .broadcast(Origin::Server, &notice::connected_notice(name))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Outbound, SessionRegistry},
        infrastructure::{
            message_pusher::TcpMessagePusher, repository::InMemorySessionRepository,
        },
    };
    use chatter_shared::time::FixedClock;
    use std::collections::HashMap;
    use tokio::sync::{Mutex, mpsc};

    const CONNECTED_AT: i64 = 1_700_000_000_000;

    struct Fixture {
        usecase: ConnectParticipantUseCase,
        registry: Arc<Mutex<SessionRegistry>>,
    }

    fn create_fixture() -> Fixture {
        let registry = Arc::new(Mutex::new(SessionRegistry::new()));
        let repository = Arc::new(InMemorySessionRepository::new(registry.clone()));
        let pusher = Arc::new(TcpMessagePusher::new(Arc::new(Mutex::new(HashMap::new()))));
        let broadcaster = Arc::new(Broadcaster::new(repository.clone(), pusher.clone()));
        let usecase = ConnectParticipantUseCase::new(
            repository,
            pusher,
            broadcaster,
            Arc::new(FixedClock::new(CONNECTED_AT)),
        );
        Fixture { usecase, registry }
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn connect(
        usecase: &ConnectParticipantUseCase,
        id: u64,
        name: &str,
    ) -> (
        Result<DisplayName, AdmissionError>,
        mpsc::UnboundedReceiver<Outbound>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let result = usecase
            .execute(ConnectionId::new(id), peer(), name, tx)
            .await;
        (result, rx)
    }

    #[tokio::test]
    async fn test_connect_participant_success() {
        // テスト項目: 新規参加者が正常に接続できる
        // given (前提条件):
        let f = create_fixture();

        // when (操作):
        let (result, _rx) = connect(&f.usecase, 1, "alice").await;

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
        let registry = f.registry.lock().await;
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup(ConnectionId::new(1)).map(|n| n.as_str()),
            Some("alice")
        );
    }

    #[tokio::test]
    async fn test_connect_participant_duplicate_error() {
        // テスト項目: 重複した名前での接続試行がエラーになる
        // given (前提条件):
        let f = create_fixture();
        let (first, _rx1) = connect(&f.usecase, 1, "alice").await;
        first.unwrap();

        // when (操作): 同じ名前で接続を試みる
        let (result, _rx2) = connect(&f.usecase, 2, "alice").await;

        // then (期待する結果): 重複エラーが返され、登録は 1 人のまま
        assert_eq!(result, Err(AdmissionError::Taken("alice".to_string())));
        assert_eq!(f.registry.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_rejection_order() {
        // テスト項目: 拒否理由は 予約名 → 禁止文字 → 重複 → BAN の順で判定される
        // given (前提条件):
        let f = create_fixture();
        let (first, _rx1) = connect(&f.usecase, 1, "alice").await;
        first.unwrap();
        let (second, _rx2) = connect(&f.usecase, 2, "mallory").await;
        second.unwrap();
        f.registry.lock().await.ban("mallory").unwrap();

        // when (操作):
        let (reserved, _) = connect(&f.usecase, 3, "Server").await;
        let (illegal, _) = connect(&f.usecase, 4, "al(ice").await;
        let (taken, _) = connect(&f.usecase, 5, "alice").await;
        let (banned, _) = connect(&f.usecase, 6, "mallory").await;

        // then (期待する結果):
        assert_eq!(reserved.unwrap_err().reason(), "reserved");
        assert_eq!(illegal.unwrap_err().reason(), "illegal-char");
        assert_eq!(taken.unwrap_err().reason(), "taken");
        assert_eq!(banned.unwrap_err().reason(), "banned");
        assert_eq!(f.registry.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_joined_notice_reaches_new_participant() {
        // テスト項目: 接続通知は新規参加者本人にも届く
        // given (前提条件):
        let f = create_fixture();
        let (alice, mut alice_rx) = connect(&f.usecase, 1, "alice").await;
        alice.unwrap();
        let (bob, mut bob_rx) = connect(&f.usecase, 2, "bob").await;
        let bob = bob.unwrap();

        // when (操作):
        let targeted = f.usecase.broadcast_participant_joined(&bob).await;

        // then (期待する結果):
        assert_eq!(targeted, 2);
        let expected = Outbound::Text("[SERVER] bob connected to server".to_string());
        assert_eq!(alice_rx.recv().await, Some(expected.clone()));
        assert_eq!(bob_rx.recv().await, Some(expected));
    }
}
