//! Terminal client for the chatter raw TCP chat server.

pub mod domain;
pub mod error;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
