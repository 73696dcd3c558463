use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::ingest::{ChunkError, Chunker};

pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_DEPLOYMENT: &str = "COMPLETION_DEPLOYMENT_NAME";
pub const ENV_PDF_PATH: &str = "CLAIMSIFT_PDF_PATH";
pub const ENV_OUTPUT_PATH: &str = "CLAIMSIFT_OUTPUT_PATH";
pub const ENV_CHUNK_SIZE: &str = "CLAIMSIFT_CHUNK_SIZE";
pub const ENV_CHUNK_OVERLAP: &str = "CLAIMSIFT_CHUNK_OVERLAP";
pub const ENV_TEMPERATURE: &str = "CLAIMSIFT_TEMPERATURE";
pub const ENV_TOP_P: &str = "CLAIMSIFT_TOP_P";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid chunking settings: {0}")]
    Chunking(#[from] ChunkError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub pdf_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from("data").join("input.pdf"),
            output_path: PathBuf::from("output").join("extracted_test_cases.json"),
        }
    }
}

/// Chunk sizes are measured in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    pub fn chunker(&self) -> Result<Chunker, ChunkError> {
        Chunker::new(self.chunk_size, self.chunk_overlap)
    }
}

/// Azure OpenAI chat completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub api_version: String,
    pub deployment: String,
    pub temperature: f32,
    pub top_p: f32,
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            api_version: "2024-02-01".to_string(),
            deployment: "gpt-35-turbo".to_string(),
            temperature: 0.3,
            top_p: 0.95,
            connect_timeout_seconds: 30,
            request_timeout_seconds: 120,
        }
    }
}

impl LlmConfig {
    /// Ensures credentials, endpoint and deployment are present
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Missing(ENV_API_KEY));
        }
        if self.endpoint.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::Missing(ENV_ENDPOINT));
        }
        if self.deployment.is_empty() {
            return Err(ConfigError::Missing(ENV_DEPLOYMENT));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub chunking: ChunkingConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> ConfigResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_PDF_PATH) {
            config.paths.pdf_path = PathBuf::from(path);
        }
        if let Some(path) = get(ENV_OUTPUT_PATH) {
            config.paths.output_path = PathBuf::from(path);
        }

        if let Some(value) = get(ENV_CHUNK_SIZE) {
            config.chunking.chunk_size = parse_value(ENV_CHUNK_SIZE, &value)?;
        }
        if let Some(value) = get(ENV_CHUNK_OVERLAP) {
            config.chunking.chunk_overlap = parse_value(ENV_CHUNK_OVERLAP, &value)?;
        }

        config.llm.api_key = get(ENV_API_KEY);
        config.llm.endpoint = get(ENV_ENDPOINT);
        if let Some(version) = get(ENV_API_VERSION) {
            config.llm.api_version = version;
        }
        if let Some(deployment) = get(ENV_DEPLOYMENT) {
            config.llm.deployment = deployment;
        }
        if let Some(value) = get(ENV_TEMPERATURE) {
            config.llm.temperature = parse_value(ENV_TEMPERATURE, &value)?;
        }
        if let Some(value) = get(ENV_TOP_P) {
            config.llm.top_p = parse_value(ENV_TOP_P, &value)?;
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.pdf_path = path.into();
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.output_path = path.into();
        self
    }

    /// Checks everything that must hold before extraction starts
    pub fn validate(&self) -> ConfigResult<()> {
        self.chunking.chunker()?;
        self.llm.validate()
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
