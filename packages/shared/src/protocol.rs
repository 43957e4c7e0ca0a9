//! Wire protocol constants shared by the server and the client.
//!
//! The protocol has no framing: the client sends its display name as the
//! first chunk, the server answers [`TAKEN`] or [`NOT_TAKEN`], and after that
//! every chunk read from the socket is one chat message.

/// Handshake reply: the requested display name was rejected.
pub const TAKEN: &str = "taken";

/// Handshake reply: the requested display name was accepted.
pub const NOT_TAKEN: &str = "not-taken";

/// Maximum number of bytes read for the display name during the handshake.
pub const NAME_BUFFER_SIZE: usize = 1024;

/// Maximum number of bytes read per chat message.
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Exit command, used by both the client prompt and the server console.
pub const EXIT_COMMAND: &str = "/exit";

/// Welcome banner printed by both binaries at startup.
pub fn banner() -> String {
    format!(
        "_____-----============= chatter =============-----_____\n\
         _____=================== v{:<8}===============_____\n",
        env!("CARGO_PKG_VERSION")
    )
}
