use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::config::LlmConfig;
use crate::error::Result;
use crate::ingest::{parse_records, ExtractionError, ExtractionResult, Extractor, TestCaseRecord};

const PREVIEW_CHARS: usize = 200;

/// Chat completion client for an Azure OpenAI deployment.
///
/// One request per chunk, no retries. Any failure surfaces as an
/// `ExtractionError` for the caller to downgrade.
pub struct AzureChatClient {
    http: Client,
    url: Url,
    api_key: String,
    deployment: String,
    temperature: f32,
    top_p: f32,
}

impl AzureChatClient {
    /// Validates the config and builds the HTTP client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = config.endpoint.as_deref().unwrap_or_default();
        let url = chat_url(endpoint, &config.deployment, &config.api_version)?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            url,
            api_key: config.api_key.clone().unwrap_or_default(),
            deployment: config.deployment.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Sends one chunk and returns the raw assistant message
    pub async fn complete(&self, chunk: &str) -> ExtractionResult<String> {
        let user = user_prompt(chunk);
        let body = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: self.temperature,
            top_p: self.top_p,
        };

        let resp = self
            .http
            .post(self.url.clone())
            .header("api-key", self.api_key.trim())
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(ExtractionError::Status { status, body });
        }

        let parsed: ChatResponse = resp.json().await?;
        parsed.into_content().ok_or(ExtractionError::EmptyResponse)
    }
}

#[async_trait::async_trait]
impl Extractor for AzureChatClient {
    fn name(&self) -> &str {
        &self.deployment
    }

    async fn extract(&self, chunk: &str) -> ExtractionResult<Vec<TestCaseRecord>> {
        let content = self.complete(chunk).await?;

        parse_records(&content).inspect_err(|_| {
            let preview: String = content.chars().take(PREVIEW_CHARS).collect();
            tracing::debug!("Unusable model response: {}...", preview);
        })
    }
}

/// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=..`
fn chat_url(endpoint: &str, deployment: &str, api_version: &str) -> Result<Url> {
    let base = if endpoint.ends_with('/') {
        Url::parse(endpoint)
    } else {
        Url::parse(&format!("{endpoint}/"))
    }
    .map_err(ExtractionError::from)?;

    let mut url = base
        .join(&format!("openai/deployments/{deployment}/chat/completions"))
        .map_err(ExtractionError::from)?;
    url.query_pairs_mut().append_pair("api-version", api_version);
    Ok(url)
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

impl ChatResponse {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::error::Error;

    fn config() -> LlmConfig {
        LlmConfig {
            api_key: Some("secret".into()),
            endpoint: Some("https://example.openai.azure.com".into()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_chat_url() {
        let url = chat_url("https://example.openai.azure.com", "gpt-35-turbo", "2024-02-01")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.openai.azure.com/openai/deployments/gpt-35-turbo/chat/completions?api-version=2024-02-01"
        );

        let with_slash =
            chat_url("https://example.openai.azure.com/", "gpt-35-turbo", "2024-02-01").unwrap();
        assert_eq!(url, with_slash);
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = chat_url("not a url", "d", "v").unwrap_err();
        assert!(matches!(
            err,
            Error::Extraction(ExtractionError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_new_requires_credentials() {
        let err = AzureChatClient::new(&LlmConfig::default()).err().unwrap();
        assert!(matches!(err, Error::Config(ConfigError::Missing(_))));
    }

    #[test]
    fn test_new_builds_client() {
        let client = AzureChatClient::new(&config()).unwrap();
        assert!(client.url().as_str().contains("/deployments/gpt-35-turbo/"));
        assert_eq!(client.name(), "gpt-35-turbo");
    }

    #[test]
    fn test_request_body() {
        let body = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.5,
            top_p: 0.25,
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["top_p"], 0.25);
    }

    #[test]
    fn test_response_content() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "[]"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.into_content().as_deref(), Some("[]"));

        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(resp.into_content().is_none());

        let resp: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_content().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_extraction_error() {
        let client = AzureChatClient::new(&LlmConfig {
            endpoint: Some("http://127.0.0.1:9".into()),
            connect_timeout_seconds: 1,
            request_timeout_seconds: 2,
            ..config()
        })
        .unwrap();

        let err = client.extract("some chunk").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Http(_)));
    }
}
