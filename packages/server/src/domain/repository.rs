//! Repository trait 定義
//!
//! ドメイン層が必要とするセッション管理のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    AdmissionError, ConnectionId, DisconnectOutcome, DisplayName, ModerationError, Session,
};

/// Session Repository trait
///
/// セッション・キックリスト・BAN リストへのアクセスをまとめたインターフェース。
/// 各メソッドは 1 回の呼び出しで完結する（複数のコレクションにまたがる操作も
/// 途中の状態が他のタスクから見えないこと）。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを登録（名前の重複・BAN をチェック）
    async fn admit(&self, session: Session) -> Result<(), AdmissionError>;

    /// 接続 ID から表示名を取得
    async fn lookup(&self, connection_id: ConnectionId) -> Option<DisplayName>;

    /// 接続中の全セッションを取得
    async fn all(&self) -> Vec<(ConnectionId, DisplayName)>;

    /// 接続中のセッション数を取得
    async fn count(&self) -> usize;

    /// キックリストに登録してセッションを削除
    async fn kick(&self, name: &str) -> Result<Session, ModerationError>;

    /// BAN リストに登録してセッションを削除
    async fn ban(&self, name: &str) -> Result<Session, ModerationError>;

    /// 受信を終えた接続の後始末（セッション削除と切断通知の要否判定）
    async fn settle_disconnect(
        &self,
        connection_id: ConnectionId,
        name: &DisplayName,
    ) -> DisconnectOutcome;
}
