use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::application::services::DEFAULT_QA_TEMPLATE;
use crate::application::PromptTemplate;
use crate::domain::{DomainError, DEFAULT_GREETING};

pub const CONFIG_PATH_ENV: &str = "APP_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

/// Tunables from the optional YAML file plus the prompts section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Reads `$APP_CONFIG`, falling back to `config/app.yaml`. A missing
    /// default file means built-in defaults; a missing explicit file is an error.
    pub fn load() -> Result<Self, DomainError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_yaml(&raw)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, DomainError> {
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|e| DomainError::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.config.rag.top_k == 0 {
            return Err(DomainError::config("rag.top_k must be at least 1"));
        }
        if self.config.embedding.dimension == 0 {
            return Err(DomainError::config("embedding.dimension must be at least 1"));
        }
        if self.config.vector_store.collection.trim().is_empty() {
            return Err(DomainError::config("vector_store.collection must not be empty"));
        }
        self.prompt_template().map(|_| ())
    }

    pub fn prompt_template(&self) -> Result<PromptTemplate, DomainError> {
        PromptTemplate::new(self.prompts.qa.template.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub rag: RagConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u64>,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama3-8b-8192".to_string(),
            temperature: Some(0.0),
            max_tokens: None,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-004".to_string(),
            dimension: 768,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    #[default]
    Astra,
    Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorBackend,
    pub collection: String,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::Astra,
            collection: "newcollection".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: crate::application::services::DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub qa: QaPromptConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QaPromptConfig {
    pub template: String,
    pub greeting: String,
}

impl Default for QaPromptConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_QA_TEMPLATE.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

pub mod env {
    pub const ASTRA_DB_API_ENDPOINT: &str = "ASTRA_DB_API_ENDPOINT";
    pub const ASTRA_DB_APPLICATION_TOKEN: &str = "ASTRA_DB_APPLICATION_TOKEN";
    pub const ASTRA_DB_NAMESPACE: &str = "ASTRA_DB_NAMESPACE";
    pub const QDRANT_URL: &str = "QDRANT_URL";
    pub const QDRANT_API_KEY: &str = "QDRANT_API_KEY";
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
}

/// Connection secrets, taken from the environment only.
///
/// The Groq and Gemini keys are checked here but read again by the rig
/// provider clients, which pull them from the same variables.
#[derive(Clone)]
pub struct Secrets {
    pub vector: VectorCredentials,
}

#[derive(Clone)]
pub enum VectorCredentials {
    Astra {
        api_endpoint: String,
        token: String,
        namespace: String,
    },
    Qdrant {
        url: String,
        api_key: Option<String>,
    },
}

impl Secrets {
    pub fn from_env(backend: VectorBackend) -> Result<Self, DomainError> {
        Self::from_lookup(backend, |key| std::env::var(key).ok())
    }

    /// Collects every missing variable before failing, so one error names them all.
    pub fn from_lookup(
        backend: VectorBackend,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DomainError> {
        let mut missing = Vec::new();
        let mut require = |key: &'static str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(key);
                String::new()
            }
        };

        let vector = match backend {
            VectorBackend::Astra => VectorCredentials::Astra {
                api_endpoint: require(env::ASTRA_DB_API_ENDPOINT),
                token: require(env::ASTRA_DB_APPLICATION_TOKEN),
                namespace: require(env::ASTRA_DB_NAMESPACE),
            },
            VectorBackend::Qdrant => VectorCredentials::Qdrant {
                url: require(env::QDRANT_URL),
                api_key: None,
            },
        };
        require(env::GROQ_API_KEY);
        require(env::GEMINI_API_KEY);

        if !missing.is_empty() {
            return Err(DomainError::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let vector = match vector {
            VectorCredentials::Qdrant { url, .. } => VectorCredentials::Qdrant {
                url,
                api_key: lookup(env::QDRANT_API_KEY).filter(|v| !v.trim().is_empty()),
            },
            astra => astra,
        };

        Ok(Self { vector })
    }
}

impl fmt::Debug for VectorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Astra {
                api_endpoint,
                namespace,
                ..
            } => f
                .debug_struct("Astra")
                .field("api_endpoint", api_endpoint)
                .field("namespace", namespace)
                .field("token", &"<redacted>")
                .finish(),
            Self::Qdrant { url, api_key } => f
                .debug_struct("Qdrant")
                .field("url", url)
                .field("api_key", &api_key.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets").field("vector", &self.vector).finish()
    }
}
