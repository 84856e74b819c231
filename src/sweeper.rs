//! Deadline sweeper.
//!
//! A recurring background job that fails active tasks whose deadline has
//! passed. Runs once immediately at startup and then on a fixed interval.
//! A failed pass is logged and retried on the next tick; it never takes the
//! process down.

use crate::db::{Database, now_ms};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Spawn the sweeper loop on the runtime.
pub fn spawn(db: Arc<Database>, interval: Duration) -> JoinHandle<()> {
    info!(
        interval_secs = interval.as_secs(),
        "deadline sweeper started"
    );
    tokio::spawn(run(db, interval))
}

async fn run(db: Arc<Database>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        // The first tick fires immediately.
        ticker.tick().await;
        match db.sweep_overdue(now_ms()) {
            Ok(0) => {}
            Ok(failed) => info!(failed, "sweep pass marked overdue tasks as failed"),
            Err(e) => warn!(error = %e, "sweep pass failed; will retry on next tick"),
        }
    }
}
