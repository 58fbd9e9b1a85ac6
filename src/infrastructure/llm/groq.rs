use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::groq;
use std::time::Duration;

use crate::domain::{
    ports::{GenerationSink, LlmService},
    DomainError,
};
use crate::infrastructure::config::LlmConfig;

/// Llama models hosted on Groq. Reads `GROQ_API_KEY` through rig.
pub struct GroqLlm {
    client: groq::Client,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u64>,
    timeout: Duration,
}

impl GroqLlm {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: groq::Client::from_env(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl LlmService for GroqLlm {
    async fn generate(
        &self,
        prompt: &str,
        sink: &dyn GenerationSink,
    ) -> Result<String, DomainError> {
        let mut builder = self.client.agent(&self.model);
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        let agent = builder.build();

        let answer = tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| {
                DomainError::generation(format!(
                    "{} did not answer within {}s",
                    self.model,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| DomainError::generation(format!("{} request failed: {e}", self.model)))?;

        sink.on_token(&answer);
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
