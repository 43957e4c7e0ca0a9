//! Utilities shared by the chatter server and client.

pub mod logger;
pub mod protocol;
pub mod time;
