use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 未排定日期時顯示的文字
pub const UNSCHEDULED_LABEL: &str = "TBD";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Icon tag. Only used for presentation; unknown tags fall back to a map pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Plane,
    Train,
    Car,
    Ship,
    #[default]
    MapPin,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Plane => "plane",
            Category::Train => "train",
            Category::Car => "car",
            Category::Ship => "ship",
            Category::MapPin => "mapPin",
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "plane" => Category::Plane,
            "train" => Category::Train,
            "car" => Category::Car,
            "ship" => Category::Ship,
            _ => Category::MapPin,
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ItemDate {
    On(String),
    #[default]
    Unscheduled,
}

impl ItemDate {
    pub fn is_unscheduled(&self) -> bool {
        matches!(self, ItemDate::Unscheduled)
    }
}

impl From<Option<String>> for ItemDate {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(date) if !date.trim().is_empty() && date != UNSCHEDULED_LABEL => {
                ItemDate::On(date)
            }
            _ => ItemDate::Unscheduled,
        }
    }
}

impl From<ItemDate> for Option<String> {
    fn from(date: ItemDate) -> Self {
        match date {
            ItemDate::On(date) => Some(date),
            ItemDate::Unscheduled => None,
        }
    }
}

impl fmt::Display for ItemDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemDate::On(date) => f.write_str(date),
            ItemDate::Unscheduled => f.write_str(UNSCHEDULED_LABEL),
        }
    }
}

/// 行程中的一個停靠點或候選地點
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "ItemDate::is_unscheduled")]
    pub date: ItemDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date: ItemDate::Unscheduled,
            description: String::new(),
            icon: Category::MapPin,
            location: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = ItemDate::On(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(Location::new(lat, lng));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKey {
    Itinerary,
    Candidates,
}

impl PoolKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKey::Itinerary => "itinerary",
            PoolKey::Candidates => "candidates",
        }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolKey {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "itinerary" | "timeline" | "travelTimeline" => Ok(PoolKey::Itinerary),
            "candidates" | "places" | "availablePlaces" => Ok(PoolKey::Candidates),
            other => Err(PlannerError::ValidationError {
                message: format!("Unknown pool key: {}", other),
            }),
        }
    }
}

/// 拖放手勢的端點
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub pool: PoolKey,
    pub index: usize,
}

impl DragLocation {
    pub fn new(pool: PoolKey, index: usize) -> Self {
        Self { pool, index }
    }
}

impl FromStr for DragLocation {
    type Err = PlannerError;

    /// 格式: `pool:index`，例如 `itinerary:0`
    fn from_str(s: &str) -> Result<Self> {
        let (pool, index) = s.split_once(':').ok_or_else(|| PlannerError::ValidationError {
            message: format!("Expected '<pool>:<index>', got '{}'", s),
        })?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|e| PlannerError::ValidationError {
                message: format!("Invalid index '{}': {}", index, e),
            })?;
        Ok(Self::new(pool.parse()?, index))
    }
}

/// Completed gesture as reported by the drag surface. A missing destination
/// means the item was dropped outside any pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragResult {
    pub source: DragLocation,
    pub destination: Option<DragLocation>,
}

impl DragResult {
    pub fn new(source: DragLocation, destination: Option<DragLocation>) -> Self {
        Self {
            source,
            destination,
        }
    }

    pub fn cancelled(source: DragLocation) -> Self {
        Self::new(source, None)
    }
}

impl FromStr for DragResult {
    type Err = PlannerError;

    /// 格式: `itinerary:0->candidates:1`，目的地留空代表取消
    fn from_str(s: &str) -> Result<Self> {
        let (source, destination) =
            s.split_once("->").ok_or_else(|| PlannerError::ValidationError {
                message: format!("Expected '<pool>:<index>-><pool>:<index>', got '{}'", s),
            })?;
        let destination = match destination.trim() {
            "" => None,
            dest => Some(dest.parse()?),
        };
        Ok(Self::new(source.trim().parse()?, destination))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source: PoolKey,
    pub source_index: usize,
    pub destination: PoolKey,
    pub destination_index: usize,
}

impl From<TransferRequest> for DragResult {
    fn from(request: TransferRequest) -> Self {
        DragResult::new(
            DragLocation::new(request.source, request.source_index),
            Some(DragLocation::new(
                request.destination,
                request.destination_index,
            )),
        )
    }
}
