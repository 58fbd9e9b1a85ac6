//! Conversation and retrieval types, plus the ports the hosted services sit behind.

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::*;
pub use errors::{DomainError, Result};
