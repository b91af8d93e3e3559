use crate::state::AppState;
use chrono::Local;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use super::dispatch::run_dispatch_cycle;

/// Start the background scheduler: one dispatch pass every minute, plus a
/// midnight sweep of the in-memory dispatch ledger.
pub async fn start_notification_service(
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = JobScheduler::new().await?;

    // Run every minute to catch events entering their start window
    let dispatch_state = state.clone();
    let dispatch_job = Job::new_async("0 * * * * *", move |_uuid, _l| {
        let state = dispatch_state.clone();

        Box::pin(async move {
            match run_dispatch_cycle(&state, Local::now().naive_local()).await {
                Ok(0) => {}
                Ok(created) => info!("Dispatched {} event notifications", created),
                Err(e) => error!("Event dispatch cycle failed: {:?}", e),
            }
        })
    })?;

    // Entries only matter for the current day; drop them at midnight
    let ledger_state = state.clone();
    let ledger_job = Job::new_async("0 0 0 * * *", move |_uuid, _l| {
        let state = ledger_state.clone();

        Box::pin(async move {
            if state.dispatch_ledger.is_empty() {
                return;
            }
            let dropped = state.dispatch_ledger.len();
            state.dispatch_ledger.clear();
            info!("Cleared dispatch ledger ({} entries)", dropped);
        })
    })?;

    scheduler.add(dispatch_job).await?;
    scheduler.add(ledger_job).await?;
    scheduler.start().await?;

    info!("Notification service started");
    Ok(())
}
