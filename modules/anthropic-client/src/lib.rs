mod client;
pub mod schema;
pub mod types;
pub mod util;

pub use schema::StructuredOutput;

use anyhow::{anyhow, Result};

use client::AnthropicClient;
use types::*;

/// Anthropic Messages API client.
///
/// Holds the connection parameters; each call builds a fresh request through
/// the wire client.
#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    base_url: Option<String>,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: None,
            base_url: None,
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow!("ANTHROPIC_API_KEY environment variable not set"))?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Cap on output tokens for every request made through this client.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(&self) -> AnthropicClient {
        let client = AnthropicClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    fn apply_max_tokens(&self, request: ChatRequest) -> ChatRequest {
        match self.max_tokens {
            Some(max) => request.max_tokens(max),
            None => request,
        }
    }

    /// Extract a structured value from the prompts by forcing a tool call
    /// whose input schema is generated from `T`.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let schema = T::tool_schema();

        let tool_name = "structured_response";
        let mut request = ChatRequest::new(&self.model)
            .system(system_prompt)
            .message(WireMessage::user(user_prompt))
            .tool(ToolDefinition {
                name: tool_name.to_string(),
                description: "Extract structured data from the input.".to_string(),
                input_schema: schema,
            });
        request.tool_choice = Some(serde_json::json!({
            "type": "tool",
            "name": tool_name,
        }));
        let request = self.apply_max_tokens(request);

        let response = self.client().chat(&request).await?;

        if let Some(ContentBlock::ToolUse { input, .. }) = response.tool_uses().first() {
            return serde_json::from_value(input.clone())
                .map_err(|e| anyhow!("Failed to deserialize response: {}", e));
        }

        // Some model/tool combinations answer in prose carrying a fenced
        // JSON body instead of invoking the tool.
        if let Some(text) = response.text() {
            let stripped = util::strip_code_blocks(&text);
            if let Ok(parsed) = serde_json::from_str(stripped) {
                return Ok(parsed);
            }
        }

        Err(anyhow!("No structured output in Claude response"))
    }

    /// Plain single-turn chat completion, returning the first text block.
    pub async fn chat_completion(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .system(system)
            .message(WireMessage::user(user))
            .temperature(0.0);
        let request = self.apply_max_tokens(request);

        let response = self.client().chat(&request).await?;

        response
            .text()
            .ok_or_else(|| anyhow!("No response from Claude"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_new() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514");
        assert_eq!(ai.model, "claude-sonnet-4-20250514");
        assert_eq!(ai.api_key, "sk-ant-test");
        assert_eq!(ai.max_tokens, None);
    }

    #[test]
    fn test_claude_with_base_url() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514")
            .with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
    }

    #[test]
    fn test_claude_with_max_tokens() {
        let ai = Claude::new("sk-ant-test", "claude-sonnet-4-20250514").with_max_tokens(1024);
        assert_eq!(ai.max_tokens, Some(1024));
    }

    #[test]
    fn test_chat_request_serializes_tool_choice() {
        let mut request = ChatRequest::new("claude-sonnet-4-20250514")
            .system("sys")
            .message(WireMessage::user("hi"))
            .tool(ToolDefinition {
                name: "structured_response".to_string(),
                description: "Extract structured data from the input.".to_string(),
                input_schema: serde_json::json!({"type": "object"}),
            });
        request.tool_choice = Some(serde_json::json!({
            "type": "tool",
            "name": "structured_response",
        }));

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["tool_choice"]["name"], "structured_response");
        assert_eq!(wire["tools"][0]["name"], "structured_response");
        assert!(wire.get("temperature").is_none());
    }

    #[test]
    fn test_response_text_and_tool_uses() {
        let raw = serde_json::json!({
            "content": [
                {"type": "text", "text": "Using the tool."},
                {"type": "tool_use", "id": "tu_1", "name": "structured_response",
                 "input": {"areas": ["Leeds"]}}
            ],
            "stop_reason": "tool_use"
        });
        let response: ChatResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("Using the tool."));
        assert_eq!(response.tool_uses().len(), 1);
    }
}
