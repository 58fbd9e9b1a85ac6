use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingModel;
use rig::providers::gemini;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// Google text embeddings. Reads `GEMINI_API_KEY` through rig.
pub struct GeminiEmbedding {
    client: gemini::Client,
    model: String,
    dimension: usize,
}

impl GeminiEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            client: gemini::Client::from_env(),
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }
}

#[async_trait]
impl EmbeddingService for GeminiEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let model = self
            .client
            .embedding_model_with_ndims(self.model.as_str(), self.dimension);

        let embedding = model
            .embed_text(text)
            .await
            .map_err(|e| DomainError::retrieval(format!("embedding request failed: {e}")))?;

        let embedding = Embedding::from_f64(embedding.vec);
        if embedding.dimension() != self.dimension {
            return Err(DomainError::retrieval(format!(
                "{} returned {} dimensions, expected {}",
                self.model,
                embedding.dimension(),
                self.dimension
            )));
        }

        Ok(embedding)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
