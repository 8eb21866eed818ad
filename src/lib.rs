pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use crate::core::{
    pools::{DispatchOutcome, Pools},
    reorder::{reorder, transfer},
    session::PlannerSession,
};
pub use adapters::{chat_provider, ChatClient, GoogleMaps, OpenAiChat};
pub use config::{ChatBackend, PlannerConfig};
pub use domain::model::{
    Category, DragLocation, DragResult, Item, ItemDate, Location, PoolKey, TransferRequest,
};
pub use utils::error::{PlannerError, Result};
