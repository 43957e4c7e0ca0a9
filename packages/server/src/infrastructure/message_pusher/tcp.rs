//! TCP を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `PusherChannel` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）と切断（close, close_all）
//!
//! ## 設計ノート
//!
//! TCP ストリームの書き込み側は UI 層（`src/ui/handler/tcp.rs`）の書き込みタスクが所有します。
//! この実装はそのタスクにつながる `PusherChannel` を受け取り、`Outbound` を送るだけです。
//! チャンネルへの送信はブロックしないため、ロックを保持したまま送信しても
//! 他の接続の書き込みを待つことはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, Outbound, PusherChannel};

/// TCP を使った MessagePusher 実装
pub struct TcpMessagePusher {
    /// 接続中のクライアントの書き込みチャンネル
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl TcpMessagePusher {
    /// 新しい TcpMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for TcpMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("{} registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(&connection_id);
        tracing::debug!("{} unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(&connection_id)
            .ok_or(MessagePushError::ClientNotFound(connection_id))?;
        sender
            .send(Outbound::Text(content.to_string()))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to {}", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(Outbound::Text(content.to_string())) {
                    tracing::warn!("Failed to push message to {}: {}", target, e);
                } else {
                    tracing::debug!("Broadcasted message to {}", target);
                }
            } else {
                tracing::warn!("{} not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }

    async fn close(&self, connection_id: ConnectionId) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(&connection_id)
            .ok_or(MessagePushError::ClientNotFound(connection_id))?;
        sender
            .send(Outbound::Close)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Requested close of {}", connection_id);
        Ok(())
    }

    async fn close_all(&self) -> usize {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .filter(|(connection_id, sender)| {
                let sent = sender.send(Outbound::Close).is_ok();
                if !sent {
                    tracing::debug!("{} writer already gone", connection_id);
                }
                sent
            })
            .count()
    }
}
