use crate::core::conversation::{ChatEvent, ChatTurn, Conversation};
use crate::core::pools::{DispatchOutcome, Pools};
use crate::core::route::{Bounds, Route, RouteRequest, TravelMode};
use crate::core::seed::default_pools;
use crate::domain::model::{DragResult, Item, Location};
use crate::domain::ports::{ChatProvider, PlaceProvider, RouteProvider};
use crate::utils::error::Result;
use crate::utils::notify::{Notification, Notifier};

/// In-memory planning session. Owns the current pool snapshot; every pool
/// change goes through `&mut self`, one gesture at a time.
pub struct PlannerSession {
    pools: Pools,
    conversation: Conversation,
    notifier: Notifier,
    travel_mode: TravelMode,
}

impl PlannerSession {
    pub fn new(pools: Pools) -> Self {
        Self {
            pools,
            conversation: Conversation::new(),
            notifier: Notifier::new(),
            travel_mode: TravelMode::default(),
        }
    }

    pub fn with_default_seed() -> Result<Self> {
        Ok(Self::new(default_pools()?))
    }

    pub fn with_travel_mode(mut self, mode: TravelMode) -> Self {
        self.travel_mode = mode;
        self
    }

    /// 目前兩個清單的唯讀快照
    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifier.drain()
    }

    /// Entry point for a completed drag gesture. On error the pools are left
    /// exactly as they were.
    pub fn on_drag_end(&mut self, gesture: &DragResult) -> Result<DispatchOutcome> {
        let (next, outcome) = self.pools.apply(gesture).inspect_err(|e| {
            tracing::error!("Rejected gesture {:?}: {}", gesture, e);
        })?;

        match outcome {
            DispatchOutcome::Cancelled => {
                tracing::debug!("Gesture from {} dropped outside any pool", gesture.source.pool)
            }
            DispatchOutcome::Reordered { pool, from, to } => {
                tracing::debug!("Reordered {}: {} -> {}", pool, from, to)
            }
            DispatchOutcome::Transferred {
                from,
                to,
                source_index,
                destination_index,
            } => tracing::debug!(
                "Moved {}[{}] to {}[{}]",
                from,
                source_index,
                to,
                destination_index
            ),
        }

        self.pools = next;
        Ok(outcome)
    }

    pub fn add_candidate(&mut self, item: Item) -> Result<()> {
        match self.pools.append_candidate(item) {
            Ok(next) => {
                self.pools = next;
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::from(&e));
                Err(e)
            }
        }
    }

    /// Resolves `query` through the place provider and appends the result to
    /// the candidate pool. Returns `Ok(None)` when nothing matched.
    pub async fn discover_place<P: PlaceProvider + ?Sized>(
        &mut self,
        provider: &P,
        query: &str,
    ) -> Result<Option<Item>> {
        let resolved = match provider.resolve(query).await {
            Ok(resolved) => resolved,
            Err(e) => {
                self.notifier.notify(Notification::from(&e));
                return Err(e);
            }
        };

        let Some(item) = resolved else {
            tracing::info!("No place found for '{}'", query);
            self.notifier
                .notify(Notification::info(format!("No place found for \"{}\"", query)));
            return Ok(None);
        };

        self.add_candidate(item.clone())?;
        tracing::info!("📍 Added candidate '{}' ({})", item.title, item.id);
        Ok(Some(item))
    }

    /// 接受助理建議的地點名稱
    pub async fn accept_suggestion<P: PlaceProvider + ?Sized>(
        &mut self,
        provider: &P,
        place_name: &str,
    ) -> Result<Option<Item>> {
        tracing::debug!("Accepting suggested place '{}'", place_name);
        self.discover_place(provider, place_name).await
    }

    pub fn route_request(&self) -> Option<RouteRequest> {
        RouteRequest::from_itinerary(self.pools.itinerary(), self.travel_mode)
    }

    pub fn map_bounds(&self) -> Option<Bounds> {
        Bounds::from_items(self.pools.itinerary())
    }

    /// 地圖中心：行程中第一個有座標的地點
    pub fn map_center(&self) -> Option<Location> {
        self.pools
            .itinerary()
            .iter()
            .find_map(|item| item.location)
    }

    /// Fetches directions for the current itinerary. `Ok(None)` when fewer
    /// than two stops have a location.
    pub async fn plan_route<R: RouteProvider + ?Sized>(
        &mut self,
        provider: &R,
    ) -> Result<Option<Route>> {
        let Some(request) = self.route_request() else {
            tracing::debug!("Not enough located stops for a route");
            return Ok(None);
        };

        match provider.route(&request).await {
            Ok(route) => Ok(Some(route)),
            Err(e) => {
                tracing::error!("Error fetching directions: {}", e);
                self.notifier.notify(Notification::from(&e));
                Err(e)
            }
        }
    }

    /// Sends a message to the assistant, streaming the reply into the
    /// transcript. Returns the completed reply text.
    pub async fn send_chat<C: ChatProvider + ?Sized>(
        &mut self,
        provider: &C,
        query: &str,
    ) -> Result<String> {
        let history = self.conversation.messages().to_vec();
        self.conversation.begin_turn(query)?;
        let conversation_id = self.conversation.conversation_id().map(str::to_string);
        let turn = ChatTurn {
            query,
            conversation_id: conversation_id.as_deref(),
            history: &history,
        };

        let conversation = &mut self.conversation;
        let result = provider
            .send(turn, &mut |event: ChatEvent| conversation.apply(event))
            .await;

        match result {
            Ok(()) => {
                // 串流結束但沒收到 message_end
                self.conversation.finish();
                Ok(self
                    .conversation
                    .last_reply()
                    .map(|reply| reply.text.clone())
                    .unwrap_or_default())
            }
            Err(e) => {
                tracing::error!("Error sending message: {}", e);
                self.conversation.fail();
                self.notifier.notify(Notification::from(&e));
                Err(e)
            }
        }
    }
}
