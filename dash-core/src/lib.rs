//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - Shared domain models (current weather, forecast, recent searches)
//! - The weather client abstraction and its OpenWeatherMap implementation
//! - Key-value persistence and the recent-search store built on it
//! - The lookup orchestrator driving the dashboard state
//! - Configuration & credentials handling
//!
//! It is used by `weather-dash`, but any front-end can drive a [`Dashboard`].

pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod recent;
pub mod storage;

pub use client::{WeatherClient, client_from_config, openweather::OpenWeatherClient};
pub use config::{Config, Units};
pub use error::{LookupError, StoreError};
pub use lookup::{Activity, Dashboard, ForecastSlot, LookupOutcome, LookupState, Notification};
pub use model::{
    Condition, ForecastEntry, ForecastSnapshot, MAX_RECENT_SEARCHES, RecentCity, RecentSearches,
    WeatherSnapshot,
};
pub use recent::{RECENT_SEARCHES_KEY, RecentSearchStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
