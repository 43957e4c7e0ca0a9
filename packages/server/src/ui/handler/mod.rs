//! Connection handlers.

pub mod tcp;
