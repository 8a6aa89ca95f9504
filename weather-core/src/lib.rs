//! Core library for the weather app.
//!
//! This crate defines:
//! - The weather lookup client and its response models
//! - The single-slot cache of the last successful lookup
//! - The query controller and the view state it publishes
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but any front end can drive a
//! [`QueryController`] and render its [`ControllerSnapshot`].

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;
pub mod view_state;

pub use cache::CacheStore;
pub use config::Config;
pub use controller::{ControllerSnapshot, QueryController};
pub use error::QueryError;
pub use model::{ApiFailure, WeatherPayload, WeatherQueryResult, WeatherSummary};
pub use provider::{WeatherApiClient, WeatherClient};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use view_state::ViewState;
