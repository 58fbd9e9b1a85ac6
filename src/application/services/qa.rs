use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::application::services::PromptTemplate;
use crate::application::session::SessionContext;
use crate::domain::{
    ports::{GenerationSink, GenerationStep, LlmService},
    DomainError, Transcript,
};

pub const DEFAULT_TOP_K: usize = 25;

/// Answers one question: retrieve, fill the template, generate once.
pub struct QaService {
    llm: Arc<dyn LlmService>,
    prompt: PromptTemplate,
    top_k: usize,
}

impl QaService {
    pub fn new(llm: Arc<dyn LlmService>, prompt: PromptTemplate, top_k: usize) -> Self {
        Self { llm, prompt, top_k }
    }

    pub fn with_defaults(llm: Arc<dyn LlmService>) -> Self {
        Self::new(llm, PromptTemplate::default(), DEFAULT_TOP_K)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Appends the question and then exactly one assistant turn.
    ///
    /// When retrieval or generation fails, the assistant turn carries the
    /// error text and the error is returned as well. A blank question is
    /// rejected before anything is appended.
    #[instrument(skip_all, fields(collection = %context.retriever().collection()))]
    pub async fn answer(
        &self,
        question: &str,
        context: &SessionContext,
        transcript: &mut Transcript,
        sink: &dyn GenerationSink,
    ) -> Result<String, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::validation("question must not be empty"));
        }

        transcript.push_user(question);

        match self.respond(question, context, sink).await {
            Ok(answer) => {
                transcript.push_assistant(answer.as_str());
                info!(answer_len = answer.len(), "question answered");
                Ok(answer)
            }
            Err(e) => {
                warn!(error = %e, "question failed");
                transcript.push_error(e.to_string());
                Err(e)
            }
        }
    }

    async fn respond(
        &self,
        question: &str,
        context: &SessionContext,
        sink: &dyn GenerationSink,
    ) -> Result<String, DomainError> {
        sink.on_step(GenerationStep::Retrieving);
        let documents = context
            .retriever()
            .similarity_search(question, self.top_k)
            .await?;
        sink.on_step(GenerationStep::Retrieved {
            documents: documents.len(),
        });

        let prompt = self.prompt.render(&documents, question);
        debug!(
            documents = documents.len(),
            prompt_len = prompt.len(),
            model = self.llm.model(),
            "prompt filled"
        );

        sink.on_step(GenerationStep::Generating);
        let answer = self.llm.generate(&prompt, sink).await?;
        if answer.trim().is_empty() {
            return Err(DomainError::generation("model returned an empty answer"));
        }
        sink.on_step(GenerationStep::Completed);

        Ok(answer)
    }
}
