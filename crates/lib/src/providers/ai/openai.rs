use crate::{errors::CoreError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The baseline model used when the caller does not specify one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// The public OpenAI endpoint. Overridable for API-compatible alternative
/// providers via the settings base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a Value,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

// --- OpenAI provider implementation ---

/// A provider for the OpenAI chat-completions API and compatible servers.
///
/// Uses the structured-output `response_format` so the model is constrained
/// to the caller-supplied JSON schema rather than free text.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    ///
    /// `base_url` defaults to [`DEFAULT_API_BASE_URL`]; a trailing slash is
    /// tolerated. An empty API key is rejected up front so that no request
    /// is ever issued without a credential.
    pub fn new(
        api_key: &str,
        model: Option<&str>,
        base_url: Option<&str>,
    ) -> Result<Self, CoreError> {
        if api_key.trim().is_empty() {
            return Err(CoreError::MissingApiKey);
        }
        let client = ReqwestClient::builder()
            .build()
            .map_err(CoreError::ClientBuild)?;
        let base = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        Ok(Self {
            client,
            api_url: format!("{}/chat/completions", base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        response_schema: &Value,
    ) -> Result<Value, CoreError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "response",
                    strict: true,
                    schema: response_schema,
                },
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(CoreError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CoreError::AiApi(error_text));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(CoreError::AiDeserialization)?;

        let content = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();

        serde_json::from_str(&content).map_err(|e| {
            CoreError::MalformedAiResponse(format!(
                "model output is not a valid JSON object: {e}"
            ))
        })
    }
}
