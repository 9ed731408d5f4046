//! Domain types for the alarm snapshot service

pub mod alarm;

pub use alarm::{Alarm, AlarmSeverity};
