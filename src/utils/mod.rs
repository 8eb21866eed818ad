pub mod error;
pub mod logger;
pub mod notify;
pub mod validation;
