//! Fakes for the remote services, shared by unit tests across the crate.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::{SessionBootstrap, SessionContext};
use crate::domain::{
    ports::{EmbeddingService, GenerationSink, GenerationStep, LlmService, VectorStore},
    DomainError, Embedding, RetrievedDocument,
};

#[derive(Default)]
pub struct FixedEmbedding;

#[async_trait]
impl EmbeddingService for FixedEmbedding {
    async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
        Ok(Embedding::new(vec![1.0, 0.0, 0.0]))
    }

    fn model(&self) -> &str {
        "fixed"
    }

    fn dimension(&self) -> usize {
        3
    }
}

/// Fails like the embedding adapter does when the provider rejects a query.
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingService for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
        Err(DomainError::retrieval("embedding request failed: quota exceeded"))
    }

    fn model(&self) -> &str {
        "failing"
    }

    fn dimension(&self) -> usize {
        3
    }
}

/// Returns the same ranked documents for every query, ignoring `top_k`.
#[derive(Clone)]
pub struct FixedStore {
    documents: Vec<RetrievedDocument>,
    requested_k: Arc<Mutex<Option<usize>>>,
}

impl FixedStore {
    pub fn new(documents: Vec<RetrievedDocument>) -> Self {
        Self {
            documents,
            requested_k: Arc::new(Mutex::new(None)),
        }
    }

    pub fn requested_k(&self) -> Option<usize> {
        *self.requested_k.lock().unwrap()
    }
}

#[async_trait]
impl VectorStore for FixedStore {
    async fn search(
        &self,
        _query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        *self.requested_k.lock().unwrap() = Some(top_k);
        Ok(self.documents.clone())
    }

    fn collection(&self) -> &str {
        "fixed"
    }
}

pub struct FailingStore;

#[async_trait]
impl VectorStore for FailingStore {
    async fn search(
        &self,
        _query: &Embedding,
        _top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, DomainError> {
        Err(DomainError::retrieval("vector search unavailable"))
    }

    fn collection(&self) -> &str {
        "failing"
    }
}

pub fn context_with(store: FixedStore) -> SessionContext {
    SessionContext::new(Arc::new(FixedEmbedding), Arc::new(store))
}

/// Answers every prompt with the same text and remembers the prompts.
pub struct ScriptedLlm {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn generate(
        &self,
        prompt: &str,
        sink: &dyn GenerationSink,
    ) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        sink.on_token(&self.answer);
        Ok(self.answer.clone())
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

pub struct FailingLlm;

#[async_trait]
impl LlmService for FailingLlm {
    async fn generate(
        &self,
        _prompt: &str,
        _sink: &dyn GenerationSink,
    ) -> Result<String, DomainError> {
        Err(DomainError::generation("401 Unauthorized"))
    }

    fn model(&self) -> &str {
        "failing"
    }
}

#[derive(Default)]
pub struct CountingBootstrap {
    calls: AtomicUsize,
}

impl CountingBootstrap {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionBootstrap for CountingBootstrap {
    async fn bootstrap(&self) -> Result<SessionContext, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(context_with(FixedStore::new(vec![
            RetrievedDocument::new("Data Analyst - remote"),
        ])))
    }
}

pub struct FailingBootstrap;

#[async_trait]
impl SessionBootstrap for FailingBootstrap {
    async fn bootstrap(&self) -> Result<SessionContext, DomainError> {
        Err(DomainError::config("ASTRA_DB_APPLICATION_TOKEN was rejected"))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    steps: Mutex<Vec<GenerationStep>>,
    tokens: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn steps(&self) -> Vec<GenerationStep> {
        self.steps.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

impl GenerationSink for RecordingSink {
    fn on_step(&self, step: GenerationStep) {
        self.steps.lock().unwrap().push(step);
    }

    fn on_token(&self, token: &str) {
        self.tokens.lock().unwrap().push(token.to_string());
    }
}
