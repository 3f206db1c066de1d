//! services/api/src/adapters/completion.rs
//!
//! This module contains the adapter for the upstream chat-completion LLM.
//! It implements the `CompletionService` port from the `core` crate.

use async_openai::{
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use relay_core::{
    domain::{ChatMessage, CompletionRequest, Role},
    ports::{CompletionService, PortError, PortResult},
};
use serde::Deserialize;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` against an OpenAI-compatible
/// `/chat/completions` endpoint.
///
/// The payload is built with `async-openai` request types and sent with a plain
/// `reqwest` client so a non-success body reaches the caller byte for byte.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    http: reqwest::Client,
    api_base: String,
    model: String,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`. The client's timeout bounds every call.
    pub fn new(http: reqwest::Client, api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    #[allow(deprecated)] // upstream contract names the field `max_tokens`
    fn build_request(&self, request: &CompletionRequest) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>, _>>()?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
    }
}

fn to_openai_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.clone();
    Ok(match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    })
}

//=========================================================================================
// Response Shape
//=========================================================================================

// Every level is optional: a success body missing any of them yields no reply
// rather than an error.
#[derive(Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_reply(body: &str) -> PortResult<Option<String>> {
    let parsed: CompletionBody = serde_json::from_str(body)
        .map_err(|e| PortError::Transport(format!("Malformed upstream response: {e}")))?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty()))
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    async fn complete(&self, api_key: &str, request: &CompletionRequest) -> PortResult<Option<String>> {
        let payload = self
            .build_request(request)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(model = %self.model, messages = request.messages.len(), "Dispatching chat completion");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PortError::Transport(format!("Upstream request timed out: {e}"))
                } else {
                    PortError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Transport(format!("Failed to read upstream body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream completion returned an error status");
            return Err(PortError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        first_reply(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{prompt::build_messages, relay::{MAX_OUTPUT_TOKENS, TEMPERATURE}};

    #[test]
    fn request_payload_matches_upstream_contract() {
        let adapter = OpenAiCompletionAdapter::new(reqwest::Client::new(), "http://upstream/v1", "test-model");
        let request = CompletionRequest {
            messages: build_messages(Some("Hello"), &[]),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        let payload = serde_json::to_value(adapter.build_request(&request).unwrap()).unwrap();
        assert_eq!(payload["model"], "test-model");
        assert_eq!(payload["max_tokens"], MAX_OUTPUT_TOKENS);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "Hello");
        assert!(payload["temperature"].as_f64().unwrap() < 0.5);
        assert_eq!(adapter.endpoint(), "http://upstream/v1/chat/completions");
    }

    #[test]
    fn reply_is_taken_from_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"first"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(first_reply(body).unwrap().as_deref(), Some("first"));
    }

    #[test]
    fn unexpected_shapes_yield_no_reply() {
        assert_eq!(first_reply("{}").unwrap(), None);
        assert_eq!(first_reply(r#"{"choices":[]}"#).unwrap(), None);
        assert_eq!(first_reply(r#"{"choices":[{}]}"#).unwrap(), None);
        assert_eq!(first_reply(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(), None);
        assert_eq!(first_reply(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap(), None);
    }

    #[test]
    fn non_json_success_body_is_a_transport_failure() {
        assert!(matches!(first_reply("<html>oops</html>"), Err(PortError::Transport(_))));
    }
}
