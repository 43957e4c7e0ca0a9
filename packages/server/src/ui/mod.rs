//! UI layer: TCP transport and the operator console.

mod admin;
mod handler;
mod server;
mod signal;
pub mod state;

pub use admin::{AdminCommand, AdminExit, run_admin_console};
pub use server::{Server, ServerError};
