// Adapters layer: HTTP clients for the map and assistant collaborators.

pub mod chat;
pub mod google;
pub mod openai;
mod sse;

pub use chat::ChatClient;
pub use google::GoogleMaps;
pub use openai::OpenAiChat;

use crate::config::{ChatBackend, PlannerConfig};
use crate::domain::ports::ChatProvider;
use crate::utils::error::Result;

/// 依設定的 backend 建立助理客戶端
pub fn chat_provider(config: &PlannerConfig) -> Result<Box<dyn ChatProvider>> {
    let timeout = config.chat_timeout();
    let provider: Box<dyn ChatProvider> = match config.assistant.backend {
        ChatBackend::Dify => Box::new(
            ChatClient::from_config(config, timeout)?.with_user(config.assistant.user.clone()),
        ),
        ChatBackend::OpenAi => {
            let mut client = OpenAiChat::from_config(config, timeout)?;
            if let Some(model) = &config.assistant.model {
                client = client.with_model(model.clone());
            }
            if let Some(prompt) = &config.assistant.system_prompt {
                client = client.with_system_prompt(prompt.clone());
            }
            Box::new(client)
        }
    };
    tracing::debug!("Using {:?} assistant backend", config.assistant.backend);
    Ok(provider)
}
