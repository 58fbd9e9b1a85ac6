mod embedding;
mod llm;
mod vector_store;

pub use embedding::EmbeddingService;
pub use llm::{GenerationSink, GenerationStep, LlmService, NoopSink};
pub use vector_store::VectorStore;
