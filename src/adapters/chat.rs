use crate::adapters::sse::{read_events, Flow};
use crate::core::conversation::{ChatEvent, ChatTurn};
use crate::domain::ports::{ChatProvider, ConfigProvider};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    inputs: serde_json::Map<String, serde_json::Value>,
    query: &'a str,
    response_mode: &'static str,
    conversation_id: &'a str,
    user: &'a str,
}

/// Client for a hosted chat-messages endpoint that answers with an SSE stream.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    user: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            user: "user".to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, timeout: Duration) -> Result<Self> {
        let api_key = config
            .chat_api_key()
            .ok_or_else(|| PlannerError::MissingConfigError {
                field: "assistant.api_key".to_string(),
            })?;
        // 串流回應整體逾時
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.chat_endpoint().trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            user: "user".to_string(),
        })
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}

#[async_trait]
impl ChatProvider for ChatClient {
    async fn send(
        &self,
        turn: ChatTurn<'_>,
        on_event: &mut (dyn FnMut(ChatEvent) + Send),
    ) -> Result<()> {
        let url = format!("{}/chat-messages", self.endpoint);
        let body = ChatRequest {
            inputs: serde_json::Map::new(),
            query: turn.query,
            response_mode: "streaming",
            // 對話歷史由服務端依 conversation_id 保存
            conversation_id: turn.conversation_id.unwrap_or(""),
            user: &self.user,
        };

        tracing::debug!("Sending chat message to: {}", url);
        let request = self.client.post(&url).bearer_auth(&self.api_key).json(&body);

        read_events("assistant", request, |data| {
            let Some(event) = ChatEvent::from_data(data)? else {
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
