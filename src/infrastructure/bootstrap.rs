use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

use crate::application::{QaService, SessionBootstrap, SessionContext};
use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DomainError,
};
use crate::infrastructure::config::{AppConfig, Secrets, VectorCredentials};
use crate::infrastructure::{AstraVectorStore, GeminiEmbedding, GroqLlm, QdrantVectorStore};

/// Connects a session to the hosted embedding model and vector collection.
pub struct RemoteBootstrap {
    config: Arc<AppConfig>,
    secrets: Secrets,
}

impl RemoteBootstrap {
    pub fn new(config: Arc<AppConfig>, secrets: Secrets) -> Self {
        Self { config, secrets }
    }

    /// Fails with a configuration error when any required variable is unset.
    pub fn from_env(config: Arc<AppConfig>) -> Result<Self, DomainError> {
        let secrets = Secrets::from_env(config.config.vector_store.backend)?;
        Ok(Self::new(config, secrets))
    }
}

#[async_trait]
impl SessionBootstrap for RemoteBootstrap {
    #[instrument(skip(self), fields(collection = %self.config.config.vector_store.collection))]
    async fn bootstrap(&self) -> Result<SessionContext, DomainError> {
        let embedding_config = &self.config.config.embedding;
        let collection = &self.config.config.vector_store.collection;

        let embedding: Arc<dyn EmbeddingService> =
            Arc::new(GeminiEmbedding::from_config(embedding_config));

        let vector_store: Arc<dyn VectorStore> = match &self.secrets.vector {
            VectorCredentials::Astra {
                api_endpoint,
                token,
                namespace,
            } => Arc::new(
                AstraVectorStore::connect(
                    api_endpoint,
                    token,
                    namespace,
                    collection,
                    embedding_config.dimension,
                )
                .await?,
            ),
            VectorCredentials::Qdrant { url, api_key } => Arc::new(
                QdrantVectorStore::connect(
                    url,
                    api_key.as_deref(),
                    collection,
                    embedding_config.dimension,
                )
                .await?,
            ),
        };

        Ok(SessionContext::new(embedding, vector_store))
    }
}

/// Builds the question handler from configuration, backed by Groq.
///
/// Expects `GROQ_API_KEY` to be set; validate with [`Secrets`] first.
pub fn qa_service(config: &AppConfig) -> Result<QaService, DomainError> {
    let prompt = config.prompt_template()?;
    let llm = Arc::new(GroqLlm::from_config(&config.config.llm));
    Ok(QaService::new(llm, prompt, config.config.rag.top_k))
}
