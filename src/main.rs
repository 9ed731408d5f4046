//! Alarm Snapshot Service (SnapSrv)
//!
//! Serves consistent, token-pinned, paginated views over the alarm
//! store and applies indexed close/comment/delete mutations against
//! those views.

use anyhow::Result;
use snapsrv::api::routes::create_router;
use snapsrv::{
    AlarmViewService, AppState, Config, MemoryAlarmStore, PriorityMap, SnapshotManager,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Alarm Snapshot Service...");

    let config = Config::load()?;

    let priorities = match &config.priority_map {
        Some(path) => PriorityMap::from_file(path)?,
        None => PriorityMap::empty(),
    };

    let store = Arc::new(MemoryAlarmStore::new());
    let snapshots = SnapshotManager::new(config.snapshots.capacity, config.snapshots.ttl());
    let service = Arc::new(AlarmViewService::new(
        store,
        snapshots,
        priorities,
        config.pagination.clone(),
    ));

    // Periodically drop expired snapshots; expiry is also checked on
    // lookup, so the sweeper only bounds memory between accesses.
    let sweeper = service.clone();
    let sweep_interval = config.snapshots.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let dropped = sweeper.evict_expired_snapshots();
            if dropped > 0 {
                debug!(dropped, "snapshot sweep");
            }
        }
    });

    let state = AppState {
        service,
        config: Arc::new(config.clone()),
    };
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Alarm Snapshot Service started on {}", addr);
    info!("API endpoints:");
    info!("  GET    /health - Health check");
    info!("  GET    /api/v1/alarms - Paginated alarm list");
    info!("  GET    /api/v1/alarms/map - Alarm priority map");
    info!("  DELETE /api/v1/alarms/{{token}}/{{index}} - Delete alarm");
    info!("  POST   /api/v1/alarms/{{token}}/{{index}} - Close/comment alarm");

    axum::serve(listener, app).await?;
    Ok(())
}
