use crate::domain::{errors::DomainError, Embedding, RetrievedDocument};
use async_trait::async_trait;

/// Read-only view of a hosted vector collection.
///
/// Results come back most-similar first; callers must not reorder them.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError>;

    fn collection(&self) -> &str;
}
