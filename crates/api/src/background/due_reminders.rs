//! Periodic sweep that turns approaching milestone due dates into
//! notifications.
//!
//! Each milestone carries its own `reminder_days_before` window; the
//! sweep finds milestones whose window has opened and notifies the owning
//! student once per milestone. Idempotency comes from checking for an
//! existing `milestone_due_soon` notification before inserting.

use std::time::Duration;

use projecthub_db::models::notification::KIND_MILESTONE_DUE_SOON;
use projecthub_db::repositories::{MilestoneRepo, NotificationRepo};
use serde_json::json;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the due-date reminder loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Due-date reminder job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Due-date reminder job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool).await {
                    Ok(created) => {
                        if created > 0 {
                            tracing::info!(created, "Due-date reminders created");
                        } else {
                            tracing::debug!("Due-date sweep: nothing to remind");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Due-date sweep failed");
                    }
                }
            }
        }
    }
}

/// One sweep pass. Returns how many reminders were created.
async fn sweep(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let due = MilestoneRepo::list_due_soon(pool).await?;
    let mut created = 0;

    for milestone in due {
        let already =
            NotificationRepo::due_reminder_exists(pool, milestone.student_id, milestone.id)
                .await?;
        if already {
            continue;
        }

        NotificationRepo::create(
            pool,
            milestone.student_id,
            KIND_MILESTONE_DUE_SOON,
            &json!({
                "milestone_id": milestone.id,
                "title": milestone.title,
                "due_date": milestone.due_date,
            }),
        )
        .await?;
        created += 1;
    }

    Ok(created)
}
