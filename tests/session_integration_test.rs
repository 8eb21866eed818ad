use anyhow::Result;
use httpmock::prelude::*;
use itinerary_planner::core::ConfigProvider;
use itinerary_planner::utils::validation::Validate;
use itinerary_planner::{
    chat_provider, ChatClient, DragLocation, DragResult, GoogleMaps, PlannerConfig,
    PlannerSession, PoolKey,
};
use tempfile::TempDir;

fn write_config(dir: &TempDir, base_url: &str) -> Result<PlannerConfig> {
    let content = format!(
        r#"
[maps]
base_url = "{base}/maps"
api_key = "maps-test-key"
travel_mode = "driving"

[assistant]
endpoint = "{base}/v1"
api_key = "chat-test-key"
user = "integration"

[[itinerary]]
id = "item1"
title = "Visit Shibuya Crossing"
date = "June 1, 2024"
location = {{ lat = 35.6595, lng = 139.7005 }}

[[itinerary]]
id = "item2"
title = "Tour Tokyo Tower"
date = "June 2, 2024"
location = {{ lat = 35.6586, lng = 139.7454 }}

[[candidates]]
id = "place1"
title = "Explore Asakusa"
location = {{ lat = 35.7148, lng = 139.7967 }}
"#,
        base = base_url
    );

    let path = dir.path().join("planner.toml");
    std::fs::write(&path, content)?;
    let config = PlannerConfig::from_file(&path)?;
    config.validate()?;
    Ok(config)
}

#[tokio::test]
async fn test_discover_then_drag_into_itinerary_then_route() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let config = write_config(&temp_dir, &server.base_url())?;

    let place_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/maps/place/findplacefromtext/json")
            .query_param("input", "Ueno Park")
            .query_param("key", "maps-test-key");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "candidates": [{
                "place_id": "ChIJ-ueno",
                "name": "Ueno Park",
                "formatted_address": "Uenokoen, Taito City, Tokyo",
                "geometry": {"location": {"lat": 35.717, "lng": 139.7745}}
            }]
        }));
    });

    // 路線：澀谷 → 上野公園(途經) → 東京鐵塔
    let route_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/maps/directions/json")
            .query_param("origin", "35.6595,139.7005")
            .query_param("waypoints", "35.717,139.7745")
            .query_param("destination", "35.6586,139.7454");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "routes": [{"legs": [
                {"start_address": "Shibuya", "end_address": "Taito",
                 "distance": {"value": 9100}, "duration": {"value": 1800}},
                {"start_address": "Taito", "end_address": "Minato",
                 "distance": {"value": 7300}, "duration": {"value": 1500}}
            ]}]
        }));
    });

    let maps = GoogleMaps::from_config(&config, config.maps_timeout())?;
    let mut session =
        PlannerSession::new(config.initial_pools()?).with_travel_mode(config.travel_mode());

    let added = session.discover_place(&maps, "Ueno Park").await?;
    assert_eq!(added.map(|item| item.id), Some("ChIJ-ueno".to_string()));
    assert_eq!(session.pools().candidates().len(), 2);

    // 把新地點拖到行程中間
    session.on_drag_end(&DragResult::new(
        DragLocation::new(PoolKey::Candidates, 1),
        Some(DragLocation::new(PoolKey::Itinerary, 1)),
    ))?;
    let itinerary: Vec<&str> = session
        .pools()
        .itinerary()
        .iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(itinerary, vec!["item1", "ChIJ-ueno", "item2"]);

    let route = session.plan_route(&maps).await?.expect("route");
    assert_eq!(route.legs.len(), 2);
    assert_eq!(route.total_duration_seconds(), 3300);

    place_mock.assert();
    route_mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_chat_suggestion_is_resolved_into_candidates() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let config = write_config(&temp_dir, &server.base_url())?;

    let chat_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat-messages")
            .header("authorization", "Bearer chat-test-key")
            .json_body_partial(r#"{"user": "integration", "conversation_id": ""}"#);
        then.status(200)
            .header("Content-Type", "text/event-stream")
            .body(concat!(
                "data: {\"event\": \"message\", \"answer\": \"You could visit \", \"conversation_id\": \"conv-42\"}\n\n",
                "data: {\"event\": \"message\", \"answer\": \"Senso-ji.\"}\n\n",
                "data: {\"event\": \"message_end\", \"conversation_id\": \"conv-42\"}\n\n",
            ));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/maps/place/findplacefromtext/json")
            .query_param("input", "Senso-ji");
        then.status(200).json_body(serde_json::json!({
            "status": "OK",
            "candidates": [{
                "place_id": "ChIJ-sensoji",
                "name": "Senso-ji",
                "formatted_address": "2-3-1 Asakusa, Taito City, Tokyo",
                "geometry": {"location": {"lat": 35.7148, "lng": 139.7967}}
            }]
        }));
    });

    let chat = ChatClient::from_config(&config, config.chat_timeout())?
        .with_user(config.assistant.user.clone());
    let maps = GoogleMaps::from_config(&config, config.maps_timeout())?;
    let mut session = PlannerSession::new(config.initial_pools()?);

    let reply = session.send_chat(&chat, "Any temples nearby?").await?;
    assert_eq!(reply, "You could visit Senso-ji.");
    assert_eq!(session.conversation().conversation_id(), Some("conv-42"));
    chat_mock.assert();

    let before = session.pools().itinerary().to_vec();
    session.accept_suggestion(&maps, "Senso-ji").await?;
    assert_eq!(session.pools().candidates().last().unwrap().id, "ChIJ-sensoji");
    // 助理不會直接改動行程
    assert_eq!(session.pools().itinerary(), before.as_slice());
    Ok(())
}

#[tokio::test]
async fn test_chat_failure_surfaces_notification() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let config = write_config(&temp_dir, &server.base_url())?;
    assert_eq!(config.chat_api_key(), Some("chat-test-key"));

    server.mock(|when, then| {
        when.method(POST).path("/v1/chat-messages");
        then.status(503);
    });

    let chat = ChatClient::from_config(&config, config.chat_timeout())?;
    let mut session = PlannerSession::new(config.initial_pools()?);
    assert!(session.send_chat(&chat, "Hello").await.is_err());

    assert!(session.conversation().is_ready());
    let notices = session.take_notifications();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "An error occurred. Please try again.");
    Ok(())
}

#[tokio::test]
async fn test_openai_backend_streams_reply_into_conversation() -> Result<()> {
    let server = MockServer::start();
    let config = PlannerConfig::from_toml_str(&format!(
        r#"
[assistant]
backend = "openai"
endpoint = "{}/openai/v1"
api_key = "groq-key"
"#,
        server.base_url()
    ))?;
    config.validate()?;

    let completions = server.mock(|when, then| {
        when.method(POST)
            .path("/openai/v1/chat/completions")
            .header("authorization", "Bearer groq-key")
            .json_body_partial(r#"{"model": "llama-3.1-70b-versatile", "stream": true}"#)
            .body_contains("travel assistant for Tokyo");
        then.status(200)
            .header("Content-Type", "text/event-stream")
            .body(concat!(
                "data: {\"choices\": [{\"delta\": {\"content\": \"Try \"}}]}\n\n",
                "data: {\"choices\": [{\"delta\": {\"content\": \"Yanaka.\"}}]}\n\n",
                "data: [DONE]\n\n",
            ));
    });

    let chat = chat_provider(&config)?;
    let mut session = PlannerSession::new(config.initial_pools()?);
    let reply = session.send_chat(chat.as_ref(), "Somewhere quiet?").await?;

    completions.assert();
    assert_eq!(reply, "Try Yanaka.");
    let last = session.conversation().last_reply().expect("reply");
    assert!(last.complete);
    // 無狀態服務不回傳 conversation id
    assert_eq!(session.conversation().conversation_id(), None);
    Ok(())
}

#[test]
fn test_missing_api_key_is_config_error() {
    let config = PlannerConfig::default();
    let err = GoogleMaps::from_config(&config, config.maps_timeout()).unwrap_err();
    assert!(err.to_string().contains("maps.api_key"));
}
