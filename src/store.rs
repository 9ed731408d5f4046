//! Alarm store seam
//!
//! The snapshot core only ever talks to the store through [`AlarmStore`],
//! so the backing collection (here an in-memory map, elsewhere a real
//! persistence layer) can be swapped without touching snapshot logic.
//! All operations are synchronous and in-memory; there is no I/O on
//! this path.

use crate::domain::Alarm;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Authoritative collection of all known alarms
pub trait AlarmStore: Send + Sync {
    /// All alarms in unspecified order; ordering is the filter engine's job
    fn all(&self) -> Result<Vec<Alarm>>;

    /// Fetch one alarm by id
    fn get(&self, id: Uuid) -> Result<Option<Alarm>>;

    /// Insert or replace an alarm
    fn insert(&self, alarm: Alarm) -> Result<()>;

    /// Remove an alarm, returning it if it was present
    fn remove(&self, id: Uuid) -> Result<Option<Alarm>>;

    /// Set the closed flag; returns false if the alarm is unknown
    fn set_closed(&self, id: Uuid, closed: bool) -> Result<bool>;

    /// Set the operator comment verbatim; returns false if the alarm is unknown
    fn set_comment(&self, id: Uuid, comment: String) -> Result<bool>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory alarm store
#[derive(Default)]
pub struct MemoryAlarmStore {
    alarms: RwLock<HashMap<Uuid, Alarm>>,
}

impl MemoryAlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given alarms
    pub fn with_alarms(alarms: impl IntoIterator<Item = Alarm>) -> Self {
        let store = Self::new();
        {
            let mut map = store.alarms.write();
            for alarm in alarms {
                map.insert(alarm.id, alarm);
            }
        }
        store
    }

    /// Drop all alarms (test helper)
    pub fn clear(&self) {
        self.alarms.write().clear();
    }
}

impl AlarmStore for MemoryAlarmStore {
    fn all(&self) -> Result<Vec<Alarm>> {
        Ok(self.alarms.read().values().cloned().collect())
    }

    fn get(&self, id: Uuid) -> Result<Option<Alarm>> {
        Ok(self.alarms.read().get(&id).cloned())
    }

    fn insert(&self, alarm: Alarm) -> Result<()> {
        self.alarms.write().insert(alarm.id, alarm);
        Ok(())
    }

    fn remove(&self, id: Uuid) -> Result<Option<Alarm>> {
        Ok(self.alarms.write().remove(&id))
    }

    fn set_closed(&self, id: Uuid, closed: bool) -> Result<bool> {
        match self.alarms.write().get_mut(&id) {
            Some(alarm) => {
                alarm.closed = closed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_comment(&self, id: Uuid, comment: String) -> Result<bool> {
        match self.alarms.write().get_mut(&id) {
            Some(alarm) => {
                alarm.comment = Some(comment);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn len(&self) -> Result<usize> {
        Ok(self.alarms.read().len())
    }
}
