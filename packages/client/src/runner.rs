//! Client execution logic.

use super::{
    error::ClientError,
    session::{SessionEnd, connect, perform_handshake, run_client_session},
};

/// Connect, claim `username` and chat until the session ends.
///
/// There is no reconnection: a lost connection ends the client.
pub async fn run_client(host: String, port: u16, username: String) -> Result<(), ClientError> {
    println!("Trying to connect to {} on port {}", host, port);
    let mut stream = connect(&host, port).await?;

    let remainder = perform_handshake(&mut stream, &username).await?;
    tracing::info!("Connected to {}:{} as '{}'", host, port, username);
    println!("Connection successful");

    match run_client_session(stream, &username, remainder).await? {
        SessionEnd::UserExit => tracing::info!("Client session ended by user"),
        SessionEnd::ServerClosed => println!("\nDisconnected from server"),
        SessionEnd::InputClosed => tracing::info!("Input closed"),
    }

    Ok(())
}
