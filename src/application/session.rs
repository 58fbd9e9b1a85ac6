use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::application::services::{QaService, Retriever};
use crate::domain::{
    ports::{EmbeddingService, GenerationSink, VectorStore},
    DomainError, Transcript,
};

/// Remote handles a session holds once bootstrapped.
#[derive(Clone)]
pub struct SessionContext {
    embedding: Arc<dyn EmbeddingService>,
    retriever: Arc<Retriever>,
}

impl SessionContext {
    pub fn new(embedding: Arc<dyn EmbeddingService>, vector_store: Arc<dyn VectorStore>) -> Self {
        let retriever = Arc::new(Retriever::new(embedding.clone(), vector_store));
        Self {
            embedding,
            retriever,
        }
    }

    pub fn embedding(&self) -> &Arc<dyn EmbeddingService> {
        &self.embedding
    }

    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }
}

/// Builds the embedding client and attaches the vector collection.
#[async_trait]
pub trait SessionBootstrap: Send + Sync {
    async fn bootstrap(&self) -> Result<SessionContext, DomainError>;
}

/// Everything one chat session owns. Never shared between sessions.
pub struct SessionState {
    id: Uuid,
    created_at: DateTime<Utc>,
    context: Option<SessionContext>,
    transcript: Transcript,
}

impl SessionState {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            context: None,
            transcript: Transcript::new(greeting),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_some()
    }

    /// Runs `bootstrap` on the first call only. Later calls hand back the
    /// handles created the first time.
    pub async fn ensure_vector_store(
        &mut self,
        bootstrap: &dyn SessionBootstrap,
    ) -> Result<&SessionContext, DomainError> {
        if self.context.is_none() {
            let context = bootstrap.bootstrap().await?;
            info!(
                session_id = %self.id,
                collection = context.retriever().collection(),
                embedding_model = context.embedding().model(),
                "vector store ready"
            );
            self.context = Some(context);
        }
        self.context()
    }

    pub fn context(&self) -> Result<&SessionContext, DomainError> {
        self.context.as_ref().ok_or_else(not_bootstrapped)
    }

    pub async fn ask(
        &mut self,
        qa: &QaService,
        question: &str,
        sink: &dyn GenerationSink,
    ) -> Result<String, DomainError> {
        let context = self.context.as_ref().ok_or_else(not_bootstrapped)?;
        qa.answer(question, context, &mut self.transcript, sink)
            .await
    }
}

fn not_bootstrapped() -> DomainError {
    DomainError::config("vector store has not been bootstrapped for this session")
}
