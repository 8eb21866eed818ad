use crate::core::pools::Pools;
use crate::domain::model::Item;
use crate::utils::error::Result;

/// 預設行程：東京兩日遊
pub fn default_itinerary() -> Vec<Item> {
    vec![
        Item::new("item1", "Visit Shibuya Crossing")
            .with_date("June 1, 2024")
            .with_description("Experience the famous Shibuya Crossing")
            .with_location(35.6595, 139.7005),
        Item::new("item2", "Tour Tokyo Tower")
            .with_date("June 2, 2024")
            .with_description("Visit the iconic Tokyo Tower")
            .with_location(35.6586, 139.7454),
    ]
}

pub fn default_candidates() -> Vec<Item> {
    vec![
        Item::new("place1", "Explore Asakusa")
            .with_description("Visit the historic Asakusa district")
            .with_location(35.7148, 139.7967),
        Item::new("place2", "Walk around Ueno Park")
            .with_description("Enjoy a stroll in Ueno Park")
            .with_location(35.717, 139.7745),
        Item::new("place3", "Shop in Ginza")
            .with_description("Experience shopping in Ginza")
            .with_location(35.6717, 139.764),
    ]
}

pub fn default_pools() -> Result<Pools> {
    Pools::new(default_itinerary(), default_candidates())
}
