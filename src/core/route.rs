use crate::domain::model::{Item, Location};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "bicycling" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            other => Err(format!("unsupported travel mode: {}", other)),
        }
    }
}

/// Directions query for the current itinerary: first stop to last stop with
/// every stop in between as a stopover.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Location,
    pub destination: Location,
    pub waypoints: Vec<Location>,
    pub mode: TravelMode,
}

impl RouteRequest {
    /// 少於兩個有座標的停靠點時不需要路線
    pub fn from_itinerary(items: &[Item], mode: TravelMode) -> Option<Self> {
        let stops: Vec<Location> = items.iter().filter_map(|item| item.location).collect();
        if stops.len() < 2 {
            return None;
        }

        let skipped = items.len() - stops.len();
        if skipped > 0 {
            tracing::debug!("Skipping {} itinerary stops without a location", skipped);
        }

        Some(Self {
            origin: stops[0],
            destination: stops[stops.len() - 1],
            waypoints: stops[1..stops.len() - 1].to_vec(),
            mode,
        })
    }

    pub fn stop_count(&self) -> usize {
        self.waypoints.len() + 2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub start_address: String,
    pub end_address: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
}

impl Route {
    pub fn total_distance_meters(&self) -> u64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum()
    }

    pub fn total_duration_seconds(&self) -> u64 {
        self.legs.iter().map(|leg| leg.duration_seconds).sum()
    }
}

/// Bounding box used to frame the itinerary on a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Location,
    pub north_east: Location,
}

impl Bounds {
    pub fn from_items(items: &[Item]) -> Option<Self> {
        let mut locations = items.iter().filter_map(|item| item.location);
        let first = locations.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for location in locations {
            bounds.extend(location);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, location: Location) {
        self.south_west.lat = self.south_west.lat.min(location.lat);
        self.south_west.lng = self.south_west.lng.min(location.lng);
        self.north_east.lat = self.north_east.lat.max(location.lat);
        self.north_east.lng = self.north_east.lng.max(location.lng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed::{default_candidates, default_itinerary};

    #[test]
    fn test_route_request_from_itinerary() {
        let mut items = default_itinerary();
        items.extend(default_candidates());

        let request = RouteRequest::from_itinerary(&items, TravelMode::Driving).unwrap();
        assert_eq!(request.origin, Location::new(35.6595, 139.7005));
        assert_eq!(request.destination, Location::new(35.6717, 139.764));
        assert_eq!(request.waypoints.len(), 3);
        assert_eq!(request.stop_count(), 5);
    }

    #[test]
    fn test_route_request_needs_two_located_stops() {
        let items = vec![
            Item::new("a", "A").with_location(35.0, 139.0),
            Item::new("b", "B"),
        ];
        assert!(RouteRequest::from_itinerary(&items, TravelMode::Driving).is_none());
        assert!(RouteRequest::from_itinerary(&[], TravelMode::Walking).is_none());
    }

    #[test]
    fn test_bounds() {
        let bounds = Bounds::from_items(&default_candidates()).unwrap();
        assert_eq!(bounds.south_west, Location::new(35.6717, 139.764));
        assert_eq!(bounds.north_east, Location::new(35.717, 139.7967));
        assert!(Bounds::from_items(&[Item::new("x", "X")]).is_none());
    }

    #[test]
    fn test_route_totals() {
        let route = Route {
            legs: vec![
                RouteLeg {
                    start_address: "Shibuya".to_string(),
                    end_address: "Minato".to_string(),
                    distance_meters: 4_200,
                    duration_seconds: 900,
                },
                RouteLeg {
                    start_address: "Minato".to_string(),
                    end_address: "Taito".to_string(),
                    distance_meters: 7_800,
                    duration_seconds: 1_500,
                },
            ],
        };
        assert_eq!(route.total_distance_meters(), 12_000);
        assert_eq!(route.total_duration_seconds(), 2_400);
    }

    #[test]
    fn test_travel_mode_parse() {
        assert_eq!("TRANSIT".parse::<TravelMode>().unwrap(), TravelMode::Transit);
        assert!("teleport".parse::<TravelMode>().is_err());
    }
}
