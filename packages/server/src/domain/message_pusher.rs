//! MessagePusher trait 定義
//!
//! 接続へのバイト送信（通知）のインターフェース。
//! 送信先の管理と実際の書き込みは Infrastructure 層と UI 層が担当します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// Instruction for a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Write the text as one raw chunk
    Text(String),
    /// Shut the connection down; anything queued after this is dropped
    Close,
}

/// Channel feeding one connection's writer task.
pub type PusherChannel = mpsc::UnboundedSender<Outbound>;

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、送信手段（TCP など）には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: ConnectionId);

    /// 特定の接続に送信
    async fn push_to(
        &self,
        connection_id: ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 特定の接続を閉じる
    async fn close(&self, connection_id: ConnectionId) -> Result<(), MessagePushError>;

    /// 全ての接続を閉じ、閉じた数を返す
    async fn close_all(&self) -> usize;
}
