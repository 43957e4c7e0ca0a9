//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod message_pusher;
pub mod repository;
