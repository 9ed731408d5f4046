//! Alarm filtering and ordering
//!
//! Snapshot membership is decided here. Time bounds form the half-open
//! interval `[after, before)`: `after` is inclusive, `before` is
//! exclusive. `type` is an exact match. All predicates AND together.
//!
//! Ordering is newest-first by timestamp with ties broken by ascending
//! alarm id, so two snapshots built over an unchanged store always list
//! alarms in the same order. Pagination depends on this.

use crate::domain::Alarm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Filter criteria defining a snapshot's membership
///
/// Two filters are equal iff all three fields match, including both
/// being absent. Token reuse hinges on this comparison (see
/// `SnapshotManager`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub alarm_type: Option<String>,
}

impl FilterSpec {
    pub fn matches(&self, alarm: &Alarm) -> bool {
        if let Some(after) = self.after {
            if alarm.timestamp < after {
                return false;
            }
        }
        if let Some(before) = self.before {
            if alarm.timestamp >= before {
                return false;
            }
        }
        if let Some(alarm_type) = &self.alarm_type {
            if alarm.alarm_type != *alarm_type {
                return false;
            }
        }
        true
    }
}

/// Snapshot ordering key: newest first, ties by id
fn snapshot_order(a: &Alarm, b: &Alarm) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| a.id.cmp(&b.id))
}

/// Apply `filter` to the given alarms and return them in snapshot order
pub fn apply(mut alarms: Vec<Alarm>, filter: &FilterSpec) -> Vec<Alarm> {
    alarms.retain(|alarm| filter.matches(alarm));
    alarms.sort_by(snapshot_order);
    alarms
}
