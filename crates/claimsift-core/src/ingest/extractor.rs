use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DESCRIPTION_KEY: &str = "Test Case Description";
pub const REFERENCE_KEY: &str = "Reference Text";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Response contained no message content")]
    EmptyResponse,
    #[error("Could not parse JSON from response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Response was not a list (got {0})")]
    NotAnArray(&'static str),
    #[error("Response element {0} is not an object")]
    NonObjectElement(usize),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// One candidate test case. Keys other than the two required ones are kept
/// as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    #[serde(rename = "Test Case Description")]
    pub description: String,
    #[serde(rename = "Reference Text")]
    pub reference_text: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl TestCaseRecord {
    #[must_use]
    pub fn new(description: impl Into<String>, reference_text: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            reference_text: reference_text.into(),
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Turns one chunk of document text into test case records.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &str;

    async fn extract(&self, chunk: &str) -> ExtractionResult<Vec<TestCaseRecord>>;
}

/// Parses a model reply that should hold a JSON array of record objects.
///
/// A surrounding Markdown code fence is tolerated. Objects lacking either
/// required string key are dropped with a warning; anything that is not an
/// array of objects is an error.
pub fn parse_records(content: &str) -> ExtractionResult<Vec<TestCaseRecord>> {
    let value: Value = serde_json::from_str(strip_code_fence(content))?;

    let Value::Array(items) = value else {
        return Err(ExtractionError::NotAnArray(json_kind(&value)));
    };

    if let Some(idx) = items.iter().position(|item| !item.is_object()) {
        return Err(ExtractionError::NonObjectElement(idx));
    }

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<TestCaseRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping element {} without required keys: {}", idx, e),
        }
    }

    Ok(records)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
