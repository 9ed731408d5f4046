//! Alarm view service
//!
//! Orchestrates the snapshot cache, filter engine, pagination and the
//! alarm store behind the four operations the transport exposes: list,
//! priority map, delete-at-index and update-at-index.
//!
//! Mutations run inside one mutex scope covering the store change plus
//! snapshot invalidation, so a concurrent read never observes a
//! half-applied change. Reads take no lock beyond the stores' own.

use crate::domain::Alarm;
use crate::error::{AlarmError, Result};
use crate::filter::{self, FilterSpec};
use crate::pagination::{self, PageLimits};
use crate::priority::PriorityMap;
use crate::snapshot::SnapshotManager;
use crate::store::AlarmStore;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One page of alarms plus the token to continue paging with
#[derive(Debug, Clone, Serialize)]
pub struct AlarmsPage {
    pub token: Uuid,
    pub offset: usize,
    pub total: usize,
    pub items: Vec<Alarm>,
}

pub struct AlarmViewService {
    store: Arc<dyn AlarmStore>,
    snapshots: SnapshotManager,
    priorities: PriorityMap,
    limits: PageLimits,
    /// Serializes delete/update against each other; see module docs
    mutation: Mutex<()>,
}

impl AlarmViewService {
    pub fn new(
        store: Arc<dyn AlarmStore>,
        snapshots: SnapshotManager,
        priorities: PriorityMap,
        limits: PageLimits,
    ) -> Self {
        Self {
            store,
            snapshots,
            priorities,
            limits,
            mutation: Mutex::new(()),
        }
    }

    /// List alarms for the given token/filter, paginated.
    ///
    /// With no token, or a token that is unknown, expired, or was built
    /// for a different filter, a fresh snapshot is taken of the current
    /// store state. Whenever a client-supplied token could not be
    /// reused the offset is reset to 0, so the client never receives a
    /// page of unrelated data at a stale position.
    pub fn list(
        &self,
        token: Option<Uuid>,
        offset: Option<i64>,
        limit: Option<i64>,
        filter: FilterSpec,
    ) -> Result<AlarmsPage> {
        let store = &self.store;
        let resolved = self.snapshots.resolve(token, &filter, || {
            let ordered = filter::apply(store.all()?, &filter);
            Ok(ordered.into_iter().map(|a| a.id).collect())
        })?;

        let offset = if token.is_some() && !resolved.reused {
            Some(0)
        } else {
            offset
        };

        let snapshot = resolved.snapshot;
        let window = pagination::slice(snapshot.len(), offset, limit, &self.limits)?;

        // Materialize from current store state so close/comment updates
        // are visible through an existing token. An id can be missing
        // only if a delete raced this read; the entry is then skipped.
        let mut items = Vec::with_capacity(window.range().len());
        for index in window.range() {
            let id = snapshot.entry(index).ok_or(AlarmError::IndexOutOfRange {
                index,
                len: snapshot.len(),
            })?;
            if let Some(alarm) = self.store.get(id)? {
                items.push(alarm);
            }
        }

        Ok(AlarmsPage {
            token: snapshot.token,
            offset: window.offset,
            total: window.total,
            items,
        })
    }

    /// Current alarm-type to priority mapping
    pub fn priority_map(&self) -> HashMap<String, String> {
        self.priorities.get()
    }

    /// Delete the alarm the client saw at `(token, index)`.
    ///
    /// Membership changes shift positional indices, and a type
    /// disappearing can affect snapshots built for other filters, so
    /// every cached snapshot is dropped afterwards.
    pub fn delete(&self, token: Uuid, index: usize) -> Result<()> {
        let _guard = self.mutation.lock();

        let id = self.snapshots.lookup(token, index)?;
        match self.store.remove(id)? {
            Some(alarm) => {
                self.snapshots.invalidate_all();
                info!(%id, alarm_type = %alarm.alarm_type, "deleted alarm");
                Ok(())
            }
            None => {
                // Snapshot referenced an alarm that is already gone
                self.snapshots.invalidate(token);
                Err(AlarmError::AlarmNotFound(id))
            }
        }
    }

    /// Apply a close/comment update to the alarm at `(token, index)`.
    ///
    /// Neither action changes snapshot membership or ordering, so the
    /// snapshot stays valid and the client keeps paging with the same
    /// token.
    pub fn update(&self, token: Uuid, index: usize, action: &str, value: &str) -> Result<()> {
        let _guard = self.mutation.lock();

        let id = self.snapshots.lookup(token, index)?;
        let found = match action {
            "close" => {
                let closed = value
                    .trim()
                    .to_ascii_lowercase()
                    .parse::<bool>()
                    .map_err(|_| {
                        AlarmError::InvalidArgument(format!(
                            "cannot parse close value as boolean: {value}"
                        ))
                    })?;
                self.store.set_closed(id, closed)?
            }
            "comment" => self.store.set_comment(id, value.to_string())?,
            _ => {
                return Err(AlarmError::UnsupportedAction {
                    action: action.to_string(),
                    value: value.to_string(),
                })
            }
        };

        if !found {
            return Err(AlarmError::AlarmNotFound(id));
        }
        info!(%id, action, "updated alarm");
        Ok(())
    }

    /// Reload the priority mapping from its backing file
    pub fn reload_priorities(&self) -> Result<()> {
        self.priorities.reload()
    }

    /// Drop expired snapshots; called periodically by the sweeper task
    pub fn evict_expired_snapshots(&self) -> usize {
        self.snapshots.evict_expired()
    }

    /// Number of currently cached snapshots
    pub fn cached_snapshots(&self) -> usize {
        self.snapshots.len()
    }
}
