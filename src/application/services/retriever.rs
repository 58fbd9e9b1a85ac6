use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DomainError, RetrievedDocument,
};

/// The session's vector-store handle: embeds the query, then asks the
/// hosted collection for its nearest documents.
pub struct Retriever {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(embedding: Arc<dyn EmbeddingService>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding,
            vector_store,
        }
    }

    pub fn collection(&self) -> &str {
        self.vector_store.collection()
    }

    /// Returns at most `k` documents in the order the store ranked them.
    #[instrument(skip(self, query), fields(collection = %self.collection()))]
    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        let mut documents = self.vector_store.search(&embedding, k).await?;

        if documents.len() > k {
            warn!(returned = documents.len(), k, "vector store exceeded limit, truncating");
            documents.truncate(k);
        }

        debug!(count = documents.len(), "similarity search complete");
        Ok(documents)
    }
}
