use crate::core::route::{Route, RouteLeg, RouteRequest};
use crate::domain::model::{Item, Location};
use crate::domain::ports::{ConfigProvider, PlaceProvider, RouteProvider};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct PlaceCandidate {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    status: String,
    #[serde(default)]
    candidates: Vec<PlaceCandidate>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    #[serde(default)]
    error_message: Option<String>,
}

fn status_error(provider: &str, status: &str, error_message: Option<String>) -> PlannerError {
    let message = match error_message {
        Some(detail) => format!("{}: {}", status, detail),
        None => status.to_string(),
    };
    PlannerError::provider(provider, message)
}

/// 沒有地點 id 時產生一個備用 id
pub fn fallback_place_id() -> String {
    format!("place-{}", uuid::Uuid::new_v4())
}

/// Google Maps web-service client shared by the place and directions lookups.
#[derive(Debug, Clone)]
pub struct GoogleMaps {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleMaps {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C, timeout: Duration) -> Result<Self> {
        let api_key = config
            .maps_api_key()
            .ok_or_else(|| PlannerError::MissingConfigError {
                field: "maps.api_key".to_string(),
            })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.maps_base_url().trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn candidate_to_item(candidate: PlaceCandidate) -> Option<Item> {
        // 沒有座標的結果不加入
        let geometry = candidate.geometry?;
        let id = candidate
            .place_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(fallback_place_id);
        let title = candidate.name.unwrap_or_else(|| id.clone());

        let mut item = Item::new(id, title)
            .with_description(candidate.formatted_address.unwrap_or_default());
        item.location = Some(Location::new(geometry.location.lat, geometry.location.lng));
        Some(item)
    }
}

#[async_trait]
impl PlaceProvider for GoogleMaps {
    async fn resolve(&self, query: &str) -> Result<Option<Item>> {
        let url = format!("{}/place/findplacefromtext/json", self.base_url);
        tracing::debug!("Resolving place '{}' via {}", query, url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", "place_id,name,formatted_address,geometry"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: FindPlaceResponse = response.json().await?;
        tracing::debug!(
            "Place lookup status: {} ({} candidates)",
            body.status,
            body.candidates.len()
        );

        match body.status.as_str() {
            "OK" => Ok(body
                .candidates
                .into_iter()
                .next()
                .and_then(Self::candidate_to_item)),
            "ZERO_RESULTS" => Ok(None),
            status => Err(status_error("places", status, body.error_message)),
        }
    }
}

#[async_trait]
impl RouteProvider for GoogleMaps {
    async fn route(&self, request: &RouteRequest) -> Result<Route> {
        let url = format!("{}/directions/json", self.base_url);
        let origin = request.origin.to_string();
        let destination = request.destination.to_string();
        let waypoints = request
            .waypoints
            .iter()
            .map(Location::to_string)
            .collect::<Vec<_>>()
            .join("|");

        let mut params = vec![
            ("origin", origin.as_str()),
            ("destination", destination.as_str()),
            ("mode", request.mode.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if !waypoints.is_empty() {
            params.push(("waypoints", waypoints.as_str()));
        }

        tracing::debug!(
            "Requesting {} route with {} stops",
            request.mode,
            request.stop_count()
        );
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let body: DirectionsResponse = response.json().await?;
        if body.status != "OK" {
            return Err(status_error("directions", &body.status, body.error_message));
        }

        let legs = body
            .routes
            .into_iter()
            .next()
            .map(|route| route.legs)
            .unwrap_or_default()
            .into_iter()
            .map(|leg| RouteLeg {
                start_address: leg.start_address,
                end_address: leg.end_address,
                distance_meters: leg.distance.value,
                duration_seconds: leg.duration.value,
            })
            .collect();

        Ok(Route { legs })
    }
}
