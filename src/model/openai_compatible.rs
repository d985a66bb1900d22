//! Chat-completions client for OpenAI-compatible APIs (DeepSeek, OpenAI, and
//! most self-hosted gateways).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::ModelError;
use crate::protocol::{Message, ToolCallRequest};

use super::{ModelClient, ModelReply, ToolSchema};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct OpenAiCompatibleModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiCompatibleModel {
    pub fn new(config: &Config) -> Result<Self, ModelError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| ModelError::Transport(format!("invalid API key header: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.model.base_url.trim_end_matches('/').to_string(),
            model: config.model.name.clone(),
            temperature: config.model.temperature,
            max_tokens: config.model.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatibleModel {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
    ) -> Result<ModelReply, ModelError> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });
        if let Some(t) = self.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(m) = self.max_tokens {
            body["max_tokens"] = json!(m);
        }
        if !tools.is_empty() {
            body["tools"] = serde_json::to_value(tools)
                .map_err(|e| ModelError::Parse(e.to_string()))?;
            body["tool_choice"] = json!("auto");
        }

        tracing::debug!(model = %self.model, tools = tools.len(), "sending chat completion request");

        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ModelError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_chat_response(&text)
    }
}

fn parse_chat_response(body: &str) -> Result<ModelReply, ModelError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))?;

    let choice = parsed.choices.into_iter().next().ok_or(ModelError::NoChoices)?;

    Ok(ModelReply {
        content: choice.message.content.unwrap_or_default(),
        tool_calls: choice.message.tool_calls.unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCallRequest>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_text_reply() {
        let body = r#"{"choices":[{"message":{"content":"hello"}}]}"#;
        let reply = parse_chat_response(body).unwrap();
        assert_eq!(reply.content, "hello");
        assert!(reply.tool_calls.is_empty());
    }

    #[test]
    fn parses_native_tool_calls() {
        let body = r#"{
            "choices":[{"message":{
                "content":null,
                "tool_calls":[{"id":"call_1","type":"function",
                    "function":{"name":"get_current_time","arguments":"{}"}}]
            }}]
        }"#;
        let reply = parse_chat_response(body).unwrap();
        assert_eq!(reply.content, "");
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].function.name, "get_current_time");
        assert_eq!(reply.tool_calls[0].id, "call_1");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let err = parse_chat_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, ModelError::NoChoices));
    }

    #[test]
    fn garbage_body_is_a_parse_error() {
        let err = parse_chat_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }
}
