//! Common test utilities and helpers

use chrono::{TimeZone, Utc};
use snapsrv::{
    api::routes::create_router, Alarm, AlarmSeverity, AlarmViewService, AppState, Config,
    MemoryAlarmStore, PageLimits, PriorityMap, SnapshotManager,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Alarms with deterministic timestamps, alternating CHECKSUM/DISK types
pub fn seed_alarms(n: usize) -> Vec<Alarm> {
    (0..n)
        .map(|i| {
            let ts = Utc.timestamp_opt(1_000 + i as i64, 0).unwrap();
            let alarm_type = if i % 2 == 0 { "CHECKSUM" } else { "DISK" };
            Alarm::at(ts, alarm_type, AlarmSeverity::Major, format!("alarm {i}"))
                .with_source(format!("pool-{i:02}"))
        })
        .collect()
}

pub fn test_priorities() -> PriorityMap {
    let mut map = HashMap::new();
    map.insert("CHECKSUM".to_string(), "critical".to_string());
    map.insert("DISK".to_string(), "high".to_string());
    PriorityMap::from_map(map)
}

/// Build a test state over a seeded in-memory store
pub fn create_test_state(alarms: Vec<Alarm>) -> (AppState, Arc<MemoryAlarmStore>) {
    let store = Arc::new(MemoryAlarmStore::with_alarms(alarms));
    let service = Arc::new(AlarmViewService::new(
        store.clone(),
        SnapshotManager::default(),
        test_priorities(),
        PageLimits::default(),
    ));
    let state = AppState {
        service,
        config: Arc::new(Config::default()),
    };
    (state, store)
}

/// Create a test router over a seeded store
pub fn create_test_router(alarms: Vec<Alarm>) -> (axum::Router, Arc<MemoryAlarmStore>) {
    let (state, store) = create_test_state(alarms);
    (create_router(state), store)
}
