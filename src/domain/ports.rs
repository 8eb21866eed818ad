use crate::core::conversation::{ChatEvent, ChatTurn};
use crate::core::route::{Route, RouteRequest};
use crate::domain::model::Item;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Resolves a free-text place query into an Item for the candidate pool.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Option<Item>>;
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn route(&self, request: &RouteRequest) -> Result<Route>;
}

/// Streaming chat backend. Events are handed to `on_event` as they arrive.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn send(
        &self,
        turn: ChatTurn<'_>,
        on_event: &mut (dyn FnMut(ChatEvent) + Send),
    ) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn maps_base_url(&self) -> &str;
    fn maps_api_key(&self) -> Option<&str>;
    fn chat_endpoint(&self) -> &str;
    fn chat_api_key(&self) -> Option<&str>;
}
