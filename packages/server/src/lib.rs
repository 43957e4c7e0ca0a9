//! Raw TCP multi-user chat server.
//!
//! Accepts connections, admits each under a unique display name and relays
//! every chunk a participant sends to all other participants. The operator
//! can kick and ban participants from the server console.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
