//! Application layer - session bootstrap and question answering.
//!
//! Services here depend on domain ports (traits) only. Concrete clients
//! for the hosted embedding, vector and language model services are wired
//! in from `infrastructure`.

pub mod events;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use events::TracingSink;
pub use services::{render, render_turn, PromptTemplate, QaService, Retriever};
pub use session::{SessionBootstrap, SessionContext, SessionState};
