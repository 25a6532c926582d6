use super::model_repository::ModelRepository;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Generous ceiling so flashcard lists are not cut off mid-reply
const MAX_TOKENS: u32 = 3000;
/// Low temperature for consistent JSON-shaped output
const TEMPERATURE: f32 = 0.1;

/// Anthropic Messages API implementation of the model repository
pub struct AnthropicModelRepository {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

impl AnthropicModelRepository {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ModelRepository for AnthropicModelRepository {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, String> {
        if self.api_key.is_empty() {
            return Err("ANTHROPIC_API_KEY is not configured".to_string());
        }

        tracing::info!(
            model = %self.model,
            prompt_length = user_prompt.len(),
            "Calling Anthropic messages API"
        );

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                tracing::error!(error = %error, "Anthropic request failed");
                format!("Anthropic request failed: {}", error)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                "Anthropic API returned an error"
            );
            return Err(format!("Anthropic API error: {}", status));
        }

        let body: MessagesResponse = response.json().await.map_err(|error| {
            tracing::error!(error = %error, "Failed to parse Anthropic response envelope");
            format!("Failed to parse Anthropic response: {}", error)
        })?;

        let reply = body
            .content
            .first()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.clone())
            .unwrap_or_default();

        tracing::debug!(reply_length = reply.len(), "Anthropic reply received");

        Ok(reply)
    }
}
