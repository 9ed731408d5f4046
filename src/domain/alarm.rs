//! Alarm entity
//!
//! An alarm's identity and timestamp are fixed at creation; only the
//! `closed` flag and the operator `comment` may change afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alarm severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmSeverity {
    Critical,
    Major,
    Minor,
    Warning,
    Info,
}

/// A single operational alarm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub alarm_type: String,
    pub severity: AlarmSeverity,
    pub source: Option<String>,
    pub info: String,
    pub closed: bool,
    pub comment: Option<String>,
}

impl Alarm {
    /// Create a new open alarm stamped with the current time
    pub fn new(alarm_type: impl Into<String>, severity: AlarmSeverity, info: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            alarm_type: alarm_type.into(),
            severity,
            source: None,
            info: info.into(),
            closed: false,
            comment: None,
        }
    }

    /// Create an alarm with an explicit timestamp (ingestion replays,
    /// tests that need deterministic ordering)
    pub fn at(
        timestamp: DateTime<Utc>,
        alarm_type: impl Into<String>,
        severity: AlarmSeverity,
        info: impl Into<String>,
    ) -> Self {
        let mut alarm = Self::new(alarm_type, severity, info);
        alarm.timestamp = timestamp;
        alarm
    }

    /// Attach the originating host/service
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_alarm_is_open() {
        let alarm = Alarm::new("CHECKSUM", AlarmSeverity::Critical, "checksum mismatch");
        assert!(alarm.is_open());
        assert_eq!(alarm.alarm_type, "CHECKSUM");
        assert!(alarm.comment.is_none());
    }

    #[test]
    fn test_with_source() {
        let alarm = Alarm::new("DISK", AlarmSeverity::Major, "disk offline")
            .with_source("pool-03");
        assert_eq!(alarm.source.as_deref(), Some("pool-03"));
    }

    #[test]
    fn test_serde_type_field_name() {
        let alarm = Alarm::new("JVM", AlarmSeverity::Warning, "heap pressure");
        let json = serde_json::to_value(&alarm).unwrap();
        assert_eq!(json["type"], "JVM");
        assert_eq!(json["closed"], false);
    }
}
