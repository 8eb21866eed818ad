use crate::adapters::sse::{read_events, Flow};
use crate::core::conversation::{ChatEvent, ChatTurn, Sender};
use crate::domain::ports::{ChatProvider, ConfigProvider};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";
pub const TOKYO_SYSTEM_PROMPT: &str = "You are a helpful travel assistant for Tokyo, Japan. \
Provide recommendations and answer questions about attractions, transportation, and local customs.";

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<CompletionMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint (Groq by
/// default). The service keeps no conversation state, so every request
/// carries the system prompt and the settled transcript.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl OpenAiChat {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: TOKYO_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, timeout: Duration) -> Result<Self> {
        let api_key = config
            .chat_api_key()
            .ok_or_else(|| PlannerError::MissingConfigError {
                field: "assistant.api_key".to_string(),
            })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.chat_endpoint().trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: TOKYO_SYSTEM_PROMPT.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    fn build_request<'a>(&'a self, turn: &ChatTurn<'a>) -> CompletionRequest<'a> {
        let mut messages = vec![CompletionMessage {
            role: "system",
            content: &self.system_prompt,
        }];
        messages.extend(turn.settled_history().map(|message| CompletionMessage {
            role: match message.sender {
                Sender::User => "user",
                Sender::Bot => "assistant",
            },
            content: &message.text,
        }));
        messages.push(CompletionMessage {
            role: "user",
            content: turn.query,
        });

        CompletionRequest {
            model: &self.model,
            stream: true,
            messages,
        }
    }
}

/// 將一個串流 chunk 轉成對話事件
fn chunk_to_event(data: &str) -> Result<Option<ChatEvent>> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }
    if data == DONE_SENTINEL {
        return Ok(Some(ChatEvent::MessageEnd {
            conversation_id: None,
        }));
    }

    let chunk: StreamChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Ok(Some(ChatEvent::Error {
            message: error.message,
        }));
    }

    let answer: String = chunk
        .choices
        .into_iter()
        .filter_map(|choice| choice.delta.content)
        .collect();
    if answer.is_empty() {
        return Ok(None);
    }
    Ok(Some(ChatEvent::Message {
        answer,
        conversation_id: None,
    }))
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn send(
        &self,
        turn: ChatTurn<'_>,
        on_event: &mut (dyn FnMut(ChatEvent) + Send),
    ) -> Result<()> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = self.build_request(&turn);

        tracing::debug!("Sending {} message(s) to: {}", body.messages.len(), url);
        let request = self.client.post(&url).bearer_auth(&self.api_key).json(&body);

        read_events("assistant", request, |data| {
            let Some(event) = chunk_to_event(data)? else {
                return Ok(Flow::Continue);
            };
            if let ChatEvent::Error { message } = &event {
                let message = message.clone();
                on_event(event);
                return Err(PlannerError::provider("assistant", message));
            }
            let done = matches!(event, ChatEvent::MessageEnd { .. });
            on_event(event);
            Ok(if done { Flow::Stop } else { Flow::Continue })
        })
        .await
    }
}
