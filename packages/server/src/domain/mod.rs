//! Domain layer: sessions, moderation rules and the interfaces the use cases
//! depend on.

mod connection;
mod display_name;
mod error;
mod message_pusher;
pub mod notice;
mod registry;
mod repository;
mod session;

pub use connection::{ConnectionId, Origin};
pub use display_name::{DisplayName, ILLEGAL_CHARS, RESERVED_NAME};
pub use error::{AdmissionError, MessagePushError, ModerationError};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::{MessagePusher, Outbound, PusherChannel};
pub use registry::{DisconnectOutcome, SessionRegistry};
pub use repository::SessionRepository;
pub use session::Session;
