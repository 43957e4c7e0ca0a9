//! Raw TCP chat server with operator moderation.
//!
//! Accepts participants under unique display names and relays every message
//! to all other participants. The console accepts `/exit`, `/kick <name>` and
//! `/ban <name>`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatter-server
//! cargo run --bin chatter-server -- --host 127.0.0.1 --port 3000
//! ```

use std::{collections::HashMap, sync::Arc};

use chatter_server::{
    domain::SessionRegistry,
    infrastructure::{message_pusher::TcpMessagePusher, repository::InMemorySessionRepository},
    ui::Server,
    usecase::{
        Broadcaster, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        ModerateMembersUseCase, SendMessageUseCase,
    },
};
use chatter_shared::{logger::setup_logger, protocol::banner, time::SystemClock};
use clap::Parser;
use tokio::{io::BufReader, sync::Mutex};

#[derive(Parser, Debug)]
#[command(name = "chatter-server")]
#[command(about = "Raw TCP chat server with kick and ban support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    println!("{}", banner());

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Broadcaster
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory session registry)
    let registry = Arc::new(Mutex::new(SessionRegistry::new()));
    let repository = Arc::new(InMemorySessionRepository::new(registry));

    // 2. Create MessagePusher (raw TCP implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(TcpMessagePusher::new(message_pusher_clients));

    // 3. Create Broadcaster
    let broadcaster = Arc::new(Broadcaster::new(
        repository.clone(),
        message_pusher.clone(),
    ));

    // 4. Create UseCases
    let clock = Arc::new(SystemClock);
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        broadcaster.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        broadcaster.clone(),
        clock,
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        broadcaster.clone(),
    ));
    let moderate_members_usecase = Arc::new(ModerateMembersUseCase::new(
        repository,
        message_pusher,
        broadcaster,
    ));

    // 5. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        moderate_members_usecase,
    );
    let listener = match Server::bind(&args.host, args.port).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = server
        .run(
            listener,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    // A blocked stdin read would otherwise keep the runtime alive.
    std::process::exit(0);
}
