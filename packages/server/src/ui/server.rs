//! Server execution logic.

use std::{io, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncWrite},
    net::TcpListener,
};

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, ModerateMembersUseCase,
    SendMessageUseCase,
};

use super::{
    admin::{AdminExit, run_admin_console},
    handler::tcp::handle_connection,
    signal::shutdown_signal,
    state::AppState,
};

/// Back-off after a failed `accept`, so descriptor exhaustion does not spin.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening endpoint could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Raw TCP chat server
///
/// This struct encapsulates the use cases and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     send_message_usecase,
///     moderate_members_usecase,
/// );
/// let listener = Server::bind("0.0.0.0", 8080).await?;
/// server.run(listener, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
/// ```
pub struct Server {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// ModerateMembersUseCase（キック・BAN・停止のユースケース）
    moderate_members_usecase: Arc<ModerateMembersUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        moderate_members_usecase: Arc<ModerateMembersUseCase>,
    ) -> Self {
        Self {
            connect_participant_usecase,
            disconnect_participant_usecase,
            send_message_usecase,
            moderate_members_usecase,
        }
    }

    /// Bind the listening endpoint
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 8080, or 0 for any free port)
    pub async fn bind(host: &str, port: u16) -> Result<TcpListener, ServerError> {
        let addr = format!("{}:{}", host, port);
        TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Run the chat server until `/exit` on the admin console or a shutdown
    /// signal, then close every live connection.
    ///
    /// # Arguments
    ///
    /// * `listener` - Bound listening endpoint (see [`Server::bind`])
    /// * `admin_input` - Operator command lines
    /// * `admin_output` - Where operator diagnostics are written
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn run<R, W>(
        self,
        listener: TcpListener,
        admin_input: R,
        admin_output: W,
    ) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            disconnect_participant_usecase: self.disconnect_participant_usecase,
            send_message_usecase: self.send_message_usecase,
            moderate_members_usecase: self.moderate_members_usecase,
        });
        let moderation = app_state.moderate_members_usecase.clone();

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Type /exit, /kick <name> or /ban <name> to administer");

        let console = async {
            match run_admin_console(admin_input, admin_output, moderation.clone()).await {
                AdminExit::Shutdown => {}
                AdminExit::InputClosed => {
                    tracing::info!("Admin console closed; press Ctrl+C to shutdown");
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            _ = accept_loop(listener, app_state) => {}
            _ = console => tracing::info!("Shutdown requested from admin console"),
            _ = shutdown_signal() => {}
        }

        moderation.shutdown().await;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Accept connections forever, one task per connection.
async fn accept_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::debug!("Accepted connection from {}", peer);
                tokio::spawn(handle_connection(stream, peer, state.clone()));
            }
            Err(e) => {
                tracing::warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}
