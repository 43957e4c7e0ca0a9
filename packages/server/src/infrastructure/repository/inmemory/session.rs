//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! `SessionRegistry` をインメモリ DB として使用します。
//!
//! セッション・キックリスト・BAN リストは 1 つの `SessionRegistry` にまとまっており、
//! 全てのアクセスは 1 つの `Mutex` を通ります。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    AdmissionError, ConnectionId, DisconnectOutcome, DisplayName, ModerationError, Session,
    SessionRegistry, SessionRepository,
};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// セッションレジストリ（ドメインモデル）
    registry: Arc<Mutex<SessionRegistry>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(registry: Arc<Mutex<SessionRegistry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn admit(&self, session: Session) -> Result<(), AdmissionError> {
        let mut registry = self.registry.lock().await;
        registry.admit(session)
    }

    async fn lookup(&self, connection_id: ConnectionId) -> Option<DisplayName> {
        let registry = self.registry.lock().await;
        registry.lookup(connection_id).cloned()
    }

    async fn all(&self) -> Vec<(ConnectionId, DisplayName)> {
        let registry = self.registry.lock().await;
        registry.all()
    }

    async fn count(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.len()
    }

    async fn kick(&self, name: &str) -> Result<Session, ModerationError> {
        let mut registry = self.registry.lock().await;
        registry.kick(name)
    }

    async fn ban(&self, name: &str) -> Result<Session, ModerationError> {
        let mut registry = self.registry.lock().await;
        registry.ban(name)
    }

    async fn settle_disconnect(
        &self,
        connection_id: ConnectionId,
        name: &DisplayName,
    ) -> DisconnectOutcome {
        let mut registry = self.registry.lock().await;
        registry.settle_disconnect(connection_id, name)
    }
}
