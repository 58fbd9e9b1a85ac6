use std::fmt;

use crate::domain::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait LlmService: Send + Sync {
    /// Runs one generation for an already filled prompt.
    ///
    /// `sink` may receive any number of events before this returns. The
    /// returned text is the final answer.
    async fn generate(&self, prompt: &str, sink: &dyn GenerationSink)
        -> Result<String, DomainError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStep {
    Retrieving,
    Retrieved { documents: usize },
    Generating,
    Completed,
}

impl fmt::Display for GenerationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retrieving => write!(f, "Searching job listings"),
            Self::Retrieved { documents } => write!(f, "Found {documents} relevant listings"),
            Self::Generating => write!(f, "Thinking"),
            Self::Completed => write!(f, "Done"),
        }
    }
}

/// Observer for progress while a question is being answered.
pub trait GenerationSink: Send + Sync {
    fn on_step(&self, _step: GenerationStep) {}

    fn on_token(&self, _token: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl GenerationSink for NoopSink {}
