//! Alarm Snapshot Service Library
//!
//! This module exports the public API for the alarm snapshot service.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod priority;
pub mod service;
pub mod snapshot;
pub mod store;

pub use config::Config;
pub use domain::{Alarm, AlarmSeverity};
pub use error::{AlarmError, Result};
pub use filter::FilterSpec;
pub use pagination::PageLimits;
pub use priority::PriorityMap;
pub use service::{AlarmViewService, AlarmsPage};
pub use snapshot::{Snapshot, SnapshotManager};
pub use store::{AlarmStore, MemoryAlarmStore};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: std::sync::Arc<AlarmViewService>,
    pub config: std::sync::Arc<Config>,
}
