//! TCP client session management.

use chatter_shared::protocol::{NAME_BUFFER_SIZE, RECV_BUFFER_SIZE};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
    task::JoinError,
};

use crate::{
    domain::{HandshakeReply, InputAction, classify_input, parse_handshake_reply},
    error::ClientError,
};

use super::ui::{prompt, redisplay_prompt};

/// How a chat session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `/exit`
    UserExit,
    /// The server closed the connection
    ServerClosed,
    /// The terminal reached end of input or was interrupted
    InputClosed,
}

/// Connect to the chat server.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream, ClientError> {
    match TcpStream::connect((host, port)).await {
        Ok(stream) => Ok(stream),
        Err(e) => {
            tracing::debug!("Failed to connect to {}:{}: {}", host, port, e);
            Err(ClientError::ConnectionError(
                "Could not connect to server".to_string(),
            ))
        }
    }
}

/// Send the display name and wait for the server's verdict.
///
/// Returns any text the server sent right after `not-taken` in the same
/// chunk.
pub async fn perform_handshake(
    stream: &mut TcpStream,
    username: &str,
) -> Result<String, ClientError> {
    stream.write_all(username.as_bytes()).await?;

    let mut buf = vec![0u8; NAME_BUFFER_SIZE];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Err(ClientError::ConnectionError(
            "Server closed the connection during the handshake".to_string(),
        ));
    }

    match parse_handshake_reply(&String::from_utf8_lossy(&buf[..n])) {
        HandshakeReply::Accepted { remainder } => Ok(remainder),
        HandshakeReply::Rejected => Err(ClientError::NameTaken(username.to_string())),
    }
}

/// Run an admitted chat session until the user exits or the server closes
/// the connection.
pub async fn run_client_session(
    stream: TcpStream,
    username: &str,
    remainder: String,
) -> Result<SessionEnd, ClientError> {
    let (mut read, mut write) = stream.into_split();

    if !remainder.is_empty() {
        print!("\n{}\n", remainder);
        redisplay_prompt(username);
    }

    // Spawn a task to print incoming messages
    let username_for_read = username.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            match read.read(&mut buf).await {
                Ok(0) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Ok(n) => {
                    print!("\n{}\n", String::from_utf8_lossy(&buf[..n]));
                    redisplay_prompt(&username_for_read);
                }
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    break;
                }
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt_text = prompt(username);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt_text) {
                Ok(line) => {
                    if !line.is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if input_tx.send(line).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to forward typed lines to the server
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            match classify_input(&line) {
                InputAction::Exit => {
                    let _ = write.shutdown().await;
                    return Ok(SessionEnd::UserExit);
                }
                InputAction::Ignore => {}
                InputAction::Send(text) => {
                    if let Err(e) = write.write_all(text.as_bytes()).await {
                        tracing::warn!("Failed to send message: {}", e);
                        return Err(ClientError::ConnectionError(
                            "Connection lost".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(SessionEnd::InputClosed)
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            Ok(SessionEnd::ServerClosed)
        }
        write_result = &mut write_task => {
            read_task.abort();
            input_task_outcome(write_result)
        }
    }
}

/// A failed (panicked or cancelled) input task counts as closed input.
fn input_task_outcome(
    result: Result<Result<SessionEnd, ClientError>, JoinError>,
) -> Result<SessionEnd, ClientError> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Input task failed: {}", e);
        Ok(SessionEnd::InputClosed)
    })
}
