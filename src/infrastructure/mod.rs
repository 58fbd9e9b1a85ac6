pub mod bootstrap;
pub mod config;
pub mod embedding;
pub mod llm;
pub mod vector_store;

pub use bootstrap::{qa_service, RemoteBootstrap};
pub use config::{AppConfig, Config, PromptsConfig, Secrets, VectorBackend};
pub use embedding::GeminiEmbedding;
pub use llm::GroqLlm;
pub use vector_store::{AstraVectorStore, QdrantVectorStore};
