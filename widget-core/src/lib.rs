//! Core library for the weather home-screen widget.
//!
//! This crate defines:
//! - The cached location record and its display-ready row projection
//! - The per-instance list provider the host shell queries
//! - Host registration and refresh handling for placed widgets
//! - The key-value store the cache lives in, and on-disk configuration
//!
//! It is used by `weather-widget`, but any host shell can drive it through
//! [`ListAdapter`] and [`WidgetHost`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod icon;
pub mod model;
pub mod provider;
pub mod render;
pub mod store;

pub use config::WidgetConfig;
pub use coordinator::{
    HostEvent, ListService, ViewTemplate, WidgetHost, WidgetId, WidgetUpdateCoordinator,
};
pub use error::{CacheError, IconLookupError, RenderError, StoreError};
pub use icon::{IconLookup, IconRef, WmoIconLookup};
pub use model::{RowDescriptor, RowKind, WeatherRecord};
pub use provider::{ListAdapter, ProviderState, ReloadOutcome, WidgetListDataProvider};
pub use render::{ItemViewRenderer, RowLabels, RowRenderer};
pub use store::{CACHE_KEY, FileStore, KeyValueStore, MemoryStore};
