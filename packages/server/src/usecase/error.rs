//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::ConnectionId;

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The connection no longer has a session (kicked, banned or cleaned up)
    #[error("{0} has no live session")]
    SessionNotFound(ConnectionId),
}
