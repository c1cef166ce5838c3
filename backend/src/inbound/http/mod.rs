//! HTTP inbound adapter exposing the attendance REST endpoints.

pub mod attendance;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::{ApiResult, json_config};
