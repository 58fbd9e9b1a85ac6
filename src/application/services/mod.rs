mod prompt;
mod qa;
mod render;
mod retriever;

pub use prompt::{PromptTemplate, DEFAULT_QA_TEMPLATE};
pub use qa::{QaService, DEFAULT_TOP_K};
pub use render::{render, render_turn};
pub use retriever::Retriever;
