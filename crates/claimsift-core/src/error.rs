use thiserror::Error;

use crate::config::ConfigError;
use crate::ingest::ExtractionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_errors_convert() {
        let err: Error = ConfigError::Missing("AZURE_OPENAI_API_KEY").into();
        assert_eq!(
            err.to_string(),
            "Configuration error: AZURE_OPENAI_API_KEY is not set"
        );

        let err: Error = ExtractionError::EmptyResponse.into();
        assert!(matches!(err, Error::Extraction(ExtractionError::EmptyResponse)));
    }
}
