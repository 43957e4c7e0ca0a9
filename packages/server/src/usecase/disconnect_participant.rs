//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - セッション削除、送信チャンネルの登録解除、切断通知の要否
//!
//! ### なぜこのテストが必要か
//! - キック・BAN された参加者について余計な切断通知が出ないことを保証
//! - キックによる抑制は 1 回限りであることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - キック直後の切断（通知なし）
//! - BAN 後の切断（通知なし）

use std::sync::Arc;

use chatter_shared::time::{Clock, elapsed_millis, timestamp_to_rfc3339};

use crate::domain::{
    ConnectionId, DisconnectOutcome, DisplayName, MessagePusher, Origin, Session,
    SessionRepository, notice,
};

use super::broadcast::Broadcaster;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Broadcaster（全員への配信）
    broadcaster: Arc<Broadcaster>,
    /// 接続時間の計算用
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
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

    /// 参加者切断を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 受信を終えた接続の ID
    /// * `name` - その接続が登録時に使った表示名
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: &DisplayName,
    ) -> DisconnectOutcome {
        // 1. セッション削除とキック・BAN の確認
        let outcome = self
            .repository
            .settle_disconnect(connection_id, name)
            .await;

        // 2. MessagePusher から登録解除（書き込みタスクが終了する）
        self.message_pusher.unregister_client(connection_id).await;

        if let Some(session) = &outcome.session {
            let elapsed = elapsed_millis(session.connected_at, self.clock.now_millis());
            tracing::info!(
                "'{}' ({}) joined at {}, left after {} ms",
                name,
                session.peer,
                timestamp_to_rfc3339(session.connected_at),
                elapsed
            );
        }

        // 3. 抑制されていなければ切断を通知
        if outcome.notice_suppressed {
            tracing::debug!("Disconnect notice for '{}' suppressed", name);
        } else {
            self.broadcaster
                .broadcast(Origin::Server, &notice::disconnected_notice(name))
                .await;
        }

        outcome
    }

    /// 参加通知を送る前に失敗した接続を後始末（切断通知なし）
    pub async fn abandon(
        &self,
        connection_id: ConnectionId,
        name: &DisplayName,
    ) -> Option<Session> {
        let outcome = self
            .repository
            .settle_disconnect(connection_id, name)
            .await;
        self.message_pusher.unregister_client(connection_id).await;
        tracing::debug!("Abandoned '{}' before announcing it", name);
        outcome.session
    }
}
