mod astra;
mod qdrant;

pub use astra::AstraVectorStore;
pub use qdrant::QdrantVectorStore;
