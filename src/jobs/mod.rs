//! Background sync loop
//!
//! Interval mode runs passes on a dedicated task so the liveness endpoint
//! stays responsive while a pass is in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::services::SyncService;

/// Spawn the recurring sync loop.
///
/// The first pass starts immediately; afterwards the loop sleeps the full
/// interval between passes, so passes never overlap. A failed pass is
/// logged and the loop carries on to the next one.
pub fn spawn_sync_loop(sync: Arc<SyncService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            info!("Running watchlist sync");
            if let Err(e) = sync.run_once().await {
                tracing::error!("Watchlist sync error: {:#}", e);
            }
            info!(minutes = interval.as_secs() / 60, "Sleeping until next sync pass");
            tokio::time::sleep(interval).await;
        }
    })
}
