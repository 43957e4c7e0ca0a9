//! Raw TCP chat client.
//!
//! Claims a display name on the server, prints every message it receives and
//! sends each line typed at the `[<name>] ` prompt. Type `/exit` to leave.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatter-client -- --username alice
//! cargo run --bin chatter-client -- -u bob -H 192.168.0.10 -p 3000
//! ```

use clap::Parser;

use chatter_client::{error::ClientError, run_client};
use chatter_shared::{logger::setup_logger, protocol::banner};

#[derive(Parser, Debug)]
#[command(name = "chatter-client")]
#[command(about = "Raw TCP chat client", long_about = None)]
struct Args {
    /// Display name to claim on the server (must be unique)
    #[arg(short = 'u', long)]
    username: String,

    /// Server host name or address
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();
    println!("{}", banner());

    // Run the client
    let code = match run_client(args.host, args.port, args.username).await {
        Ok(()) => 0,
        Err(ClientError::NameTaken(_)) => {
            println!("Username not available");
            1
        }
        Err(ClientError::ConnectionError(reason)) => {
            println!("{}", reason);
            1
        }
        Err(e) => {
            tracing::error!("Client error: {}", e);
            1
        }
    };

    // The readline thread may still be blocked on the terminal.
    std::process::exit(code);
}
