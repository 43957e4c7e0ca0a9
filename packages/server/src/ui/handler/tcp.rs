//! Raw TCP connection handler.
//!
//! One task per accepted connection: it runs the display name handshake,
//! spawns the connection's writer task and then receives chat chunks until
//! the connection ends.

use std::{collections::VecDeque, io, net::SocketAddr, sync::Arc};

use chatter_shared::protocol::{NAME_BUFFER_SIZE, NOT_TAKEN, RECV_BUFFER_SIZE, TAKEN};
use tokio::{
    io::{AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::{TcpStream, tcp::OwnedReadHalf},
    sync::mpsc,
    task::JoinHandle,
};

use crate::{
    domain::{ConnectionId, DisplayName, Outbound},
    ui::state::AppState,
};

/// Why a connection stopped receiving.
#[derive(Debug)]
enum ReceiveEnd {
    /// The peer closed its side (zero-byte read)
    PeerClosed,
    /// Reading from the socket failed
    ReadFailed(io::Error),
    /// The writer task ended: forced close by moderation or a failed write
    WriterClosed,
    /// The session was removed while the connection was still open
    SessionGone,
}

/// Handle one accepted connection until it terminates.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    let connection_id = ConnectionId::next();
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!("Failed to set TCP_NODELAY for {}: {}", peer, e);
    }
    let (mut reader, mut writer) = stream.into_split();

    // Handshake: the first chunk is the requested display name
    let mut name_buf = vec![0u8; NAME_BUFFER_SIZE];
    let n = match reader.read(&mut name_buf).await {
        Ok(0) => {
            tracing::debug!("{} closed before sending a display name", peer);
            return;
        }
        Ok(n) => n,
        Err(e) => {
            tracing::warn!("Failed to read display name from {}: {}", peer, e);
            return;
        }
    };
    let requested_name = String::from_utf8_lossy(&name_buf[..n]).into_owned();

    let (tx, rx) = mpsc::unbounded_channel();
    let name = match state
        .connect_participant_usecase
        .execute(connection_id, peer, &requested_name, tx)
        .await
    {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!(
                "Rejected display name {:?} from {} ({}): {}",
                requested_name,
                peer,
                e.reason(),
                e
            );
            if let Err(e) = writer.write_all(TAKEN.as_bytes()).await {
                tracing::debug!("Failed to send rejection to {}: {}", peer, e);
            }
            let _ = writer.shutdown().await;
            return;
        }
    };

    if let Err(e) = writer.write_all(NOT_TAKEN.as_bytes()).await {
        tracing::warn!("Failed to acknowledge '{}' at {}: {}", name, peer, e);
        state
            .disconnect_participant_usecase
            .abandon(connection_id, &name)
            .await;
        return;
    }
    tracing::info!("'{}' connected from {} as {}", name, peer, connection_id);

    let mut writer_task = pusher_loop(rx, writer);
    state
        .connect_participant_usecase
        .broadcast_participant_joined(&name)
        .await;

    let end = receive_loop(&mut reader, &mut writer_task, &state, connection_id, &name).await;
    match &end {
        ReceiveEnd::PeerClosed => tracing::info!("'{}' closed the connection", name),
        ReceiveEnd::ReadFailed(e) => tracing::info!("'{}' read failed: {}", name, e),
        ReceiveEnd::WriterClosed => tracing::info!("'{}' connection was closed", name),
        ReceiveEnd::SessionGone => tracing::info!("'{}' no longer has a session", name),
    }

    // Unregistering drops the channel sender, which ends the writer task and
    // closes the write half; the read half is dropped on return.
    state
        .disconnect_participant_usecase
        .execute(connection_id, &name)
        .await;
}

/// Spawns a task that receives `Outbound` instructions from the rx channel and
/// writes them to the connection.
///
/// The task ends after `Outbound::Close`, after a failed write, or once every
/// sender of the channel is gone. `Outbound::Close` takes effect even while a
/// write is stalled on a peer that stopped reading; text still queued behind
/// it is dropped.
fn pusher_loop<W>(mut rx: mpsc::UnboundedReceiver<Outbound>, mut writer: W) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut pending = VecDeque::new();
        loop {
            let text = match pending.pop_front() {
                Some(text) => text,
                None => match rx.recv().await {
                    Some(Outbound::Text(text)) => text,
                    Some(Outbound::Close) => break,
                    None => return,
                },
            };
            match write_or_close(&mut writer, &text, &mut rx, &mut pending).await {
                WriteEnd::Written => {}
                WriteEnd::Closed => break,
                WriteEnd::Abandoned => return,
            }
        }
        let _ = writer.shutdown().await;
    })
}

/// Outcome of one write in the writer task.
enum WriteEnd {
    Written,
    /// `Outbound::Close` arrived
    Closed,
    /// The write failed or every sender is gone
    Abandoned,
}

/// Write `text` while still draining the channel, so a close request is not
/// stuck behind a stalled write. Text that arrives meanwhile goes to `pending`.
async fn write_or_close<W>(
    writer: &mut W,
    text: &str,
    rx: &mut mpsc::UnboundedReceiver<Outbound>,
    pending: &mut VecDeque<String>,
) -> WriteEnd
where
    W: AsyncWrite + Unpin,
{
    let write = writer.write_all(text.as_bytes());
    tokio::pin!(write);

    loop {
        tokio::select! {
            biased;
            result = &mut write => {
                return match result {
                    Ok(()) => WriteEnd::Written,
                    Err(_) => WriteEnd::Abandoned,
                };
            }
            next = rx.recv() => match next {
                Some(Outbound::Text(text)) => pending.push_back(text),
                Some(Outbound::Close) => return WriteEnd::Closed,
                None => return WriteEnd::Abandoned,
            },
        }
    }
}

/// Relay every chunk read from the connection until it ends.
async fn receive_loop(
    reader: &mut OwnedReadHalf,
    writer_task: &mut JoinHandle<()>,
    state: &AppState,
    connection_id: ConnectionId,
    name: &DisplayName,
) -> ReceiveEnd {
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];

    loop {
        tokio::select! {
            read = reader.read(&mut buf) => match read {
                Ok(0) => return ReceiveEnd::PeerClosed,
                Ok(n) => {
                    let content = String::from_utf8_lossy(&buf[..n]);
                    tracing::debug!("Received {} byte(s) from '{}'", n, name);
                    if state
                        .send_message_usecase
                        .execute(connection_id, &content)
                        .await
                        .is_err()
                    {
                        return ReceiveEnd::SessionGone;
                    }
                }
                Err(e) => return ReceiveEnd::ReadFailed(e),
            },
            _ = &mut *writer_task => return ReceiveEnd::WriterClosed,
        }
    }
}
