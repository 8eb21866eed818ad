pub mod conversation;
pub mod pools;
pub mod reorder;
pub mod route;
pub mod seed;
pub mod session;

pub use crate::domain::model::{DragLocation, DragResult, Item, PoolKey, TransferRequest};
pub use crate::domain::ports::{ChatProvider, ConfigProvider, PlaceProvider, RouteProvider};
pub use crate::utils::error::Result;
