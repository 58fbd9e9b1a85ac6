mod conversation;
mod document;
mod embedding;

pub use conversation::{ConversationTurn, Transcript, TurnRole, DEFAULT_GREETING};
pub use document::{join_context, RetrievedDocument};
pub use embedding::Embedding;
