//! Snapshot cache and token management
//!
//! A snapshot pins a filtered, ordered view of the alarm store at a
//! point in time and is addressed by an opaque v4 token. Snapshots are
//! immutable after creation and handed out as `Arc<Snapshot>`, so a
//! page read that is in flight keeps working even if the token is
//! evicted underneath it. Only a new snapshot (new token) ever reflects
//! new store state.

use crate::error::{AlarmError, Result};
use crate::filter::FilterSpec;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Default number of cached snapshots
pub const DEFAULT_CAPACITY: usize = 64;
/// Default snapshot lifetime in seconds
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Immutable, ordered, filtered view of the alarm log
#[derive(Debug)]
pub struct Snapshot {
    pub token: Uuid,
    pub filter: FilterSpec,
    pub created_at: DateTime<Utc>,
    /// Alarm ids in snapshot order, fixed at creation
    entries: Vec<Uuid>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positional lookup within [0, len)
    pub fn entry(&self, index: usize) -> Option<Uuid> {
        self.entries.get(index).copied()
    }

    pub fn entries(&self) -> &[Uuid] {
        &self.entries
    }
}

/// Outcome of resolving an optional token against a requested filter
pub struct Resolved {
    pub snapshot: Arc<Snapshot>,
    /// False when a fresh snapshot was built; the caller resets the
    /// offset to 0 in that case if the client had supplied a token
    pub reused: bool,
}

struct CacheInner {
    snapshots: HashMap<Uuid, Arc<Snapshot>>,
    /// Insertion order, oldest first, for capacity eviction
    order: VecDeque<Uuid>,
}

/// Token -> snapshot cache with capacity and age bounds
pub struct SnapshotManager {
    inner: RwLock<CacheInner>,
    capacity: usize,
    ttl: Duration,
}

impl SnapshotManager {
    pub fn new(capacity: usize, ttl: std::time::Duration) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                snapshots: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(DEFAULT_TTL_SECS as i64)),
        }
    }

    /// Resolve a client request to a snapshot.
    ///
    /// With no token a fresh snapshot is always built from `entries()`
    /// (the refresh path). With a token, the cached snapshot is reused
    /// only when it exists, has not expired, and was built for an equal
    /// `FilterSpec`; any other case falls back to a fresh snapshot so a
    /// client that changed filters mid-pagination never receives a page
    /// of unrelated data.
    pub fn resolve<F>(&self, token: Option<Uuid>, filter: &FilterSpec, entries: F) -> Result<Resolved>
    where
        F: FnOnce() -> Result<Vec<Uuid>>,
    {
        if let Some(token) = token {
            match self.get(token) {
                Ok(snapshot) if snapshot.filter == *filter => {
                    return Ok(Resolved {
                        snapshot,
                        reused: true,
                    });
                }
                Ok(_) => {
                    debug!(
                        %token,
                        "filter changed since snapshot was built, discarding association"
                    );
                }
                Err(err) if err.is_not_found() => {
                    debug!(%token, "unknown or expired snapshot token, building fresh");
                }
                Err(err) => return Err(err),
            }
        }

        let snapshot = self.create(filter.clone(), entries()?);
        Ok(Resolved {
            snapshot,
            reused: false,
        })
    }

    /// Materialize and cache a new snapshot under a fresh token
    pub fn create(&self, filter: FilterSpec, entries: Vec<Uuid>) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot {
            token: Uuid::new_v4(),
            filter,
            created_at: Utc::now(),
            entries,
        });

        let mut inner = self.inner.write();
        inner.snapshots.insert(snapshot.token, snapshot.clone());
        inner.order.push_back(snapshot.token);
        while inner.snapshots.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    if inner.snapshots.remove(&oldest).is_some() {
                        debug!(token = %oldest, "evicted snapshot over capacity");
                    }
                }
                None => break,
            }
        }
        debug!(token = %snapshot.token, entries = snapshot.len(), "created snapshot");
        snapshot
    }

    /// Fetch the snapshot for `token`; expired entries count as unknown
    pub fn get(&self, token: Uuid) -> Result<Arc<Snapshot>> {
        let inner = self.inner.read();
        match inner.snapshots.get(&token) {
            Some(snapshot) if !self.expired(snapshot) => Ok(snapshot.clone()),
            _ => Err(AlarmError::UnknownToken(token)),
        }
    }

    /// Resolve `(token, index)` to the alarm id the client saw at that
    /// position. No fallback: mutation requires an addressable snapshot.
    pub fn lookup(&self, token: Uuid, index: usize) -> Result<Uuid> {
        let snapshot = self.get(token)?;
        snapshot.entry(index).ok_or(AlarmError::IndexOutOfRange {
            index,
            len: snapshot.len(),
        })
    }

    pub fn invalidate(&self, token: Uuid) {
        let mut inner = self.inner.write();
        if inner.snapshots.remove(&token).is_some() {
            inner.order.retain(|t| *t != token);
            debug!(%token, "invalidated snapshot");
        }
    }

    /// Drop every cached snapshot; used after mutations that change
    /// membership, where positional indices can no longer be trusted
    pub fn invalidate_all(&self) {
        let mut inner = self.inner.write();
        let dropped = inner.snapshots.len();
        inner.snapshots.clear();
        inner.order.clear();
        if dropped > 0 {
            debug!(dropped, "invalidated all snapshots");
        }
    }

    /// Remove expired entries, returning how many were dropped
    pub fn evict_expired(&self) -> usize {
        let mut inner = self.inner.write();
        let CacheInner { snapshots, order } = &mut *inner;
        let cutoff = Utc::now() - self.ttl;
        let before = snapshots.len();
        snapshots.retain(|_, s| s.created_at > cutoff);
        let dropped = before - snapshots.len();
        if dropped > 0 {
            order.retain(|t| snapshots.contains_key(t));
            debug!(dropped, "evicted expired snapshots");
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.inner.read().snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn expired(&self, snapshot: &Snapshot) -> bool {
        Utc::now() - snapshot.created_at > self.ttl
    }
}

impl Default for SnapshotManager {
    fn default() -> Self {
        Self::new(
            DEFAULT_CAPACITY,
            std::time::Duration::from_secs(DEFAULT_TTL_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_fresh_resolve_mints_new_token() {
        let manager = SnapshotManager::default();
        let filter = FilterSpec::default();

        let a = manager.resolve(None, &filter, || Ok(ids(3))).unwrap();
        let b = manager.resolve(None, &filter, || Ok(ids(3))).unwrap();

        assert!(!a.reused);
        assert!(!b.reused);
        assert_ne!(a.snapshot.token, b.snapshot.token);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_token_reuse_for_equal_filter() {
        let manager = SnapshotManager::default();
        let filter = FilterSpec {
            alarm_type: Some("A".to_string()),
            ..Default::default()
        };

        let first = manager.resolve(None, &filter, || Ok(ids(2))).unwrap();
        let again = manager
            .resolve(Some(first.snapshot.token), &filter, || {
                panic!("must not rebuild on reuse")
            })
            .unwrap();

        assert!(again.reused);
        assert_eq!(again.snapshot.token, first.snapshot.token);
        assert_eq!(again.snapshot.entries(), first.snapshot.entries());
    }

    #[test]
    fn test_filter_mismatch_builds_fresh() {
        let manager = SnapshotManager::default();
        let filter_a = FilterSpec {
            alarm_type: Some("A".to_string()),
            ..Default::default()
        };
        let filter_b = FilterSpec {
            alarm_type: Some("B".to_string()),
            ..Default::default()
        };

        let first = manager.resolve(None, &filter_a, || Ok(ids(2))).unwrap();
        let second = manager
            .resolve(Some(first.snapshot.token), &filter_b, || Ok(ids(1)))
            .unwrap();

        assert!(!second.reused);
        assert_ne!(second.snapshot.token, first.snapshot.token);
        assert_eq!(second.snapshot.filter, filter_b);
    }

    #[test]
    fn test_absent_filter_field_counts_as_mismatch() {
        let manager = SnapshotManager::default();
        let unfiltered = FilterSpec::default();
        let typed = FilterSpec {
            alarm_type: Some("A".to_string()),
            ..Default::default()
        };

        let first = manager.resolve(None, &unfiltered, || Ok(ids(2))).unwrap();
        let second = manager
            .resolve(Some(first.snapshot.token), &typed, || Ok(ids(1)))
            .unwrap();

        assert!(!second.reused);
    }

    #[test]
    fn test_unknown_token_builds_fresh() {
        let manager = SnapshotManager::default();
        let resolved = manager
            .resolve(Some(Uuid::new_v4()), &FilterSpec::default(), || Ok(ids(1)))
            .unwrap();
        assert!(!resolved.reused);
    }

    #[test]
    fn test_lookup_errors() {
        let manager = SnapshotManager::default();
        let entries = ids(2);
        let snapshot = manager.create(FilterSpec::default(), entries.clone());

        assert_eq!(manager.lookup(snapshot.token, 1).unwrap(), entries[1]);

        let err = manager.lookup(snapshot.token, 2).unwrap_err();
        assert!(matches!(
            err,
            AlarmError::IndexOutOfRange { index: 2, len: 2 }
        ));

        let err = manager.lookup(Uuid::new_v4(), 0).unwrap_err();
        assert!(matches!(err, AlarmError::UnknownToken(_)));
    }

    #[test]
    fn test_invalidate_all_forgets_tokens() {
        let manager = SnapshotManager::default();
        let snapshot = manager.create(FilterSpec::default(), ids(2));

        manager.invalidate_all();

        assert!(manager.get(snapshot.token).is_err());
        // The held reference stays usable after eviction
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let manager = SnapshotManager::new(2, StdDuration::from_secs(600));
        let first = manager.create(FilterSpec::default(), ids(1));
        let second = manager.create(FilterSpec::default(), ids(1));
        let third = manager.create(FilterSpec::default(), ids(1));

        assert_eq!(manager.len(), 2);
        assert!(manager.get(first.token).is_err());
        assert!(manager.get(second.token).is_ok());
        assert!(manager.get(third.token).is_ok());
    }

    #[test]
    fn test_ttl_expiry_counts_as_unknown() {
        let manager = SnapshotManager::new(8, StdDuration::from_millis(0));
        let snapshot = manager.create(FilterSpec::default(), ids(1));
        std::thread::sleep(StdDuration::from_millis(5));

        assert!(manager.get(snapshot.token).is_err());
        assert_eq!(manager.evict_expired(), 1);
        assert!(manager.is_empty());
    }
}
