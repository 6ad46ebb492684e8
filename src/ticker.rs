use crate::dates::today;
use crate::reconcile::reconcile_in_place;
use crate::state::AppState;
use crate::storage::persist_data;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

/// Reconciles and flushes the log every `period`.
///
/// The flush doubles as the retry for any save that failed since the last tick.
pub fn spawn_reconcile_loop(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately; startup already reconciled.
        interval.tick().await;

        loop {
            interval.tick().await;
            tick(&state).await;
        }
    })
}

pub(crate) async fn tick(state: &AppState) {
    let mut data = state.data.lock().await;
    let added = reconcile_in_place(&mut data, state.program.start_date, today());
    debug!(added, "reconcile tick");

    if let Err(err) = persist_data(&state.data_path, &data).await {
        error!("scheduled save failed: {err}");
    }
}
