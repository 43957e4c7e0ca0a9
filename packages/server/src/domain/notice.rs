//! Text of everything the server puts on the wire besides the handshake.

use super::DisplayName;

/// Prefix of every server-originated broadcast.
pub const SERVER_PREFIX: &str = "[SERVER] ";

/// Sent to a session right before it is kicked.
pub const KICK_NOTICE: &str = "You were kicked from the server";

/// Sent to a session right before it is banned.
pub const BAN_NOTICE: &str = "You were banned from the server";

/// Chat content relayed on behalf of a participant.
pub fn chat_line(name: &DisplayName, content: &str) -> String {
    format!("[{}] {}", name, content)
}

pub fn server_notice(text: &str) -> String {
    format!("{}{}", SERVER_PREFIX, text)
}

pub fn connected_notice(name: &DisplayName) -> String {
    server_notice(&format!("{} connected to server", name))
}

pub fn disconnected_notice(name: &DisplayName) -> String {
    server_notice(&format!("{} disconnected from server", name))
}

pub fn kicked_notice(name: &DisplayName) -> String {
    server_notice(&format!("{} was kicked from server", name))
}

pub fn banned_notice(name: &DisplayName) -> String {
    server_notice(&format!("{} was banned from server", name))
}
