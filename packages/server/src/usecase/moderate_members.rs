//! UseCase: 参加者のキック・BAN とサーバー停止
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ModerateMembersUseCase の kick / ban / shutdown
//! - MessagePusher への呼び出し（通知 → 切断 → 全体通知）の回数と内容
//!
//! ### なぜこのテストが必要か
//! - 2 回目の BAN で切断や通知が重複しないこと（冪等性）を保証
//! - 存在しない参加者へのキックで何も送信されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：キック、BAN、全接続の切断
//! - 異常系：存在しない参加者、BAN 済みの参加者

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, ModerationError, Origin, SessionRepository, notice,
};

use super::broadcast::Broadcaster;

/// キック・BAN・停止のユースケース
pub struct ModerateMembersUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Broadcaster（全員への配信）
    broadcaster: Arc<Broadcaster>,
}

impl ModerateMembersUseCase {
    /// 新しい ModerateMembersUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            broadcaster,
        }
    }

    /// 参加者をキック
    ///
    /// キックリストへの登録とセッション削除を 1 回のロックで行ってから接続を閉じるため、
    /// 接続ハンドラの後始末は必ずキックリストの登録を見る。
    pub async fn kick(&self, name: &str) -> Result<DisplayName, ModerationError> {
        let session = self.repository.kick(name).await?;
        self.notify_and_close(session.connection_id, notice::KICK_NOTICE)
            .await;
        tracing::info!("Kicked '{}' ({})", session.name, session.peer);

        self.broadcaster
            .broadcast(Origin::Server, &notice::kicked_notice(&session.name))
            .await;
        Ok(session.name)
    }

    /// 参加者を BAN（再起動までその名前では接続できない）
    pub async fn ban(&self, name: &str) -> Result<DisplayName, ModerationError> {
        let session = self.repository.ban(name).await?;
        self.notify_and_close(session.connection_id, notice::BAN_NOTICE)
            .await;
        tracing::info!("Banned '{}' ({})", session.name, session.peer);

        self.broadcaster
            .broadcast(Origin::Server, &notice::banned_notice(&session.name))
            .await;
        Ok(session.name)
    }

    /// 全ての接続を閉じる
    pub async fn shutdown(&self) -> usize {
        let closed = self.message_pusher.close_all().await;
        tracing::info!("Closed {} connection(s)", closed);
        closed
    }

    async fn notify_and_close(&self, connection_id: ConnectionId, text: &str) {
        if let Err(e) = self.message_pusher.push_to(connection_id, text).await {
            tracing::warn!("Failed to notify {}: {}", connection_id, e);
        }
        if let Err(e) = self.message_pusher.close(connection_id).await {
            tracing::warn!("Failed to close {}: {}", connection_id, e);
        }
    }
}
