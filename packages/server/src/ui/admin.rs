//! Operator console.
//!
//! Reads one command per line from the server's own input. Replies go to the
//! operator only, never to participants.

use std::sync::Arc;

use chatter_shared::protocol::EXIT_COMMAND;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::usecase::ModerateMembersUseCase;

/// A recognized operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Exit,
    Kick(String),
    Ban(String),
}

impl AdminCommand {
    /// Parse one console line. Unknown commands and commands without a target
    /// yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        if line == EXIT_COMMAND {
            return Some(AdminCommand::Exit);
        }

        let mut parts = line.split(' ');
        let command = parts.next()?;
        let target = parts.next().filter(|t| !t.is_empty()).map(str::to_string);
        match (command, target) {
            ("/kick", Some(name)) => Some(AdminCommand::Kick(name)),
            ("/ban", Some(name)) => Some(AdminCommand::Ban(name)),
            _ => None,
        }
    }
}

/// Why the console stopped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminExit {
    /// The operator asked for `/exit`
    Shutdown,
    /// Operator input reached end of file or became unreadable
    InputClosed,
}

/// Run the operator console until `/exit` or end of input.
pub async fn run_admin_console<R, W>(
    input: R,
    mut output: W,
    moderation: Arc<ModerateMembersUseCase>,
) -> AdminExit
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return AdminExit::InputClosed,
            Err(e) => {
                tracing::warn!("Failed to read console input: {}", e);
                return AdminExit::InputClosed;
            }
        };

        let failure = match AdminCommand::parse(&line) {
            Some(AdminCommand::Exit) => {
                reply(&mut output, "Shutting down server").await;
                return AdminExit::Shutdown;
            }
            Some(AdminCommand::Kick(name)) => moderation.kick(&name).await.err(),
            Some(AdminCommand::Ban(name)) => moderation.ban(&name).await.err(),
            None => {
                tracing::debug!("Ignoring console input {:?}", line);
                None
            }
        };

        if let Some(e) = failure {
            reply(&mut output, &e.to_string()).await;
        }
    }
}

async fn reply<W: AsyncWrite + Unpin>(output: &mut W, text: &str) {
    let line = format!("{}\n", text);
    if let Err(e) = output.write_all(line.as_bytes()).await {
        tracing::warn!("Failed to write to console: {}", e);
    }
    let _ = output.flush().await;
}
