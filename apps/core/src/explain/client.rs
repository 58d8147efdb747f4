use super::traits::{CompletionRequest, ExplanationBackend};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client with bearer authentication.
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| AppError::Config(format!("Invalid API token: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }
}

#[async_trait]
impl ExplanationBackend for ChatCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        info!(model = %self.model, max_tokens = request.max_tokens, "Requesting chat completion");

        let payload = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(self.headers()?)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let response: ChatResponse = res.json().await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Backend("Completion response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        debug!("Completion returned {} characters", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "You output STRICT JSON only.".to_string(),
            prompt: "Hello".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }

    #[tokio::test]
    async fn test_complete_success() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": 4000,
                "messages": [
                    { "role": "system", "content": "You output STRICT JSON only." },
                    { "role": "user", "content": "Hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "{\"ok\": true}" } }]
            })))
            .mount(&mock_server)
            .await;

        let client = ChatCompletionClient::new(
            format!("{}/v1/", mock_server.uri()),
            "test-model",
            "test-token",
        );

        // 2. Act
        let result = client.complete(request()).await;

        // 3. Assert
        assert_eq!(result.unwrap(), "{\"ok\": true}");
    }

    #[tokio::test]
    async fn test_complete_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&mock_server)
            .await;

        let client = ChatCompletionClient::new(mock_server.uri(), "test-model", "bad");
        let result = client.complete(request()).await;

        match result {
            Err(AppError::Backend(msg)) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("invalid token"));
            }
            other => panic!("Expected Backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_without_choices() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&mock_server)
            .await;

        let client = ChatCompletionClient::new(mock_server.uri(), "test-model", "token");
        let result = client.complete(request()).await;

        assert!(matches!(result, Err(AppError::Backend(_))));
    }
}
