//! LLM structured-call primitive.
//!
//! Every model interaction in the workflow is a single schema-constrained
//! completion: system prompt + user prompt in, one JSON object matching a
//! caller-supplied schema out. The [`StructuredModel`] trait keeps the
//! orchestrator and agents provider-agnostic; [`OpenAiModel`] implements it
//! against the OpenAI chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AgentError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Provider-agnostic structured completion.
///
/// Failures propagate as fatal to the calling phase; the core never
/// retries an LLM call.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Run one completion constrained to `schema` and return the raw JSON
    /// object.
    async fn call(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, AgentError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Typed wrapper over [`StructuredModel::call`].
pub async fn call_as<T: DeserializeOwned>(
    model: &dyn StructuredModel,
    system: &str,
    user: &str,
    schema_name: &str,
    schema: &Value,
) -> Result<T, AgentError> {
    let value = model.call(system, user, schema_name, schema).await?;
    serde_json::from_value(value).map_err(|e| {
        AgentError::Llm(format!(
            "model output did not match the {} schema: {}",
            schema_name, e
        ))
    })
}

/// OpenAI chat-completions client using the `json_schema` response format.
pub struct OpenAiModel {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            client: Client::new(),
            base_url: OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Point the client at a different API root. Used by tests and
    /// OpenAI-compatible gateways.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl StructuredModel for OpenAiModel {
    async fn call(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<Value, AgentError> {
        debug!(model = %self.model, schema = schema_name, "LLM call");

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "schema": schema,
                    "strict": true,
                },
            },
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Llm(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::Llm(format!(
                "API returned {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Llm(format!("malformed API response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AgentError::Llm("response contained no message content".to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| AgentError::Llm(format!("model returned invalid JSON: {}", e)))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"answer": {"type": "string"}},
            "required": ["answer"],
            "additionalProperties": false
        })
    }

    fn chat_body(content: &str) -> Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn test_trait_is_object_safe() {
        fn assert_model(_: &dyn StructuredModel) {}
        let model = OpenAiModel::new("sk-test", "gpt-4o");
        assert_model(&model);
    }

    #[tokio::test]
    async fn test_call_parses_structured_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(r#"{"answer": "42"}"#)))
            .mount(&server)
            .await;

        let model = OpenAiModel::new("sk-test", "gpt-4o").with_base_url(server.uri());
        let value = model
            .call("system", "user", "test_output", &test_schema())
            .await
            .unwrap();

        assert_eq!(value["answer"], "42");
    }

    #[tokio::test]
    async fn test_call_sends_schema_in_response_format() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {"name": "test_output", "strict": true}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(r#"{"answer": "ok"}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let model = OpenAiModel::new("sk-test", "gpt-4o").with_base_url(server.uri());
        model
            .call("system", "user", "test_output", &test_schema())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_call_surfaces_http_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let model = OpenAiModel::new("bad-key", "gpt-4o").with_base_url(server.uri());
        let err = model
            .call("system", "user", "test_output", &test_schema())
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Llm(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_call_rejects_non_json_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("not json at all")))
            .mount(&server)
            .await;

        let model = OpenAiModel::new("sk-test", "gpt-4o").with_base_url(server.uri());
        let err = model
            .call("system", "user", "test_output", &test_schema())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("invalid JSON"));
    }

    #[tokio::test]
    async fn test_call_as_deserializes_into_type() {
        #[derive(Deserialize)]
        struct Answer {
            answer: String,
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_body(r#"{"answer": "typed"}"#)),
            )
            .mount(&server)
            .await;

        let model = OpenAiModel::new("sk-test", "gpt-4o").with_base_url(server.uri());
        let answer: Answer = call_as(&model, "system", "user", "test_output", &test_schema())
            .await
            .unwrap();

        assert_eq!(answer.answer, "typed");
    }

    #[tokio::test]
    async fn test_call_as_reports_schema_mismatch() {
        #[derive(Deserialize, Debug)]
        struct Answer {
            #[allow(dead_code)]
            answer: u32,
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_body(r#"{"answer": "not a number"}"#)),
            )
            .mount(&server)
            .await;

        let model = OpenAiModel::new("sk-test", "gpt-4o").with_base_url(server.uri());
        let err = call_as::<Answer>(&model, "system", "user", "test_output", &test_schema())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("test_output"));
    }
}
