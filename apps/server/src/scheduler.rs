//! Background scheduler for the periodic refresh-and-broadcast cycle.
//!
//! Runs `refresh_all` at a fixed interval and fans the successes out to
//! subscribed connections. A failed cycle is logged and the next tick
//! starts over from scratch.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

use crate::main_lib::AppState;

/// Initial delay before the first refresh (lets the server finish starting)
const INITIAL_DELAY_SECS: u64 = 5;

/// Starts the background quote refresh scheduler.
pub fn start_refresh_scheduler(state: Arc<AppState>, interval_secs: u64) {
    let interval_secs = interval_secs.max(1);
    tokio::spawn(async move {
        info!(
            "Quote refresh scheduler started ({}s interval)",
            interval_secs
        );

        // Initial delay before the first cycle
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        // First tick is immediate, subsequent ticks are interval_secs apart
        let mut refresh_interval = interval(Duration::from_secs(interval_secs));

        loop {
            refresh_interval.tick().await;
            run_scheduled_refresh(&state).await;
        }
    });
}

/// Runs a single scheduled refresh-and-broadcast cycle.
async fn run_scheduled_refresh(state: &Arc<AppState>) {
    let report = match state.quote_service.refresh_all().await {
        Ok(report) => report,
        Err(e) => {
            // Covers the all-symbols-failed case; the next tick retries
            error!("Scheduled quote refresh failed: {}", e);
            return;
        }
    };

    if report.quotes.is_empty() {
        info!("Scheduled refresh produced no quotes to broadcast");
        return;
    }
    info!("{}", report.summary());

    match state.dispatcher.broadcast_updates(&report.quotes).await {
        Ok(broadcast) => info!("{}", broadcast.summary()),
        Err(e) => warn!("Broadcast after scheduled refresh failed: {}", e),
    }
}
