//! Background cleanup
//!
//! A rejection session left unanswered would swallow the admin's next
//! unrelated message forever, so stale sessions are swept on an interval.

use std::time::Duration;

use tracing::{error, info};

use crate::services::ModerationService;

/// Periodic sweep of expired moderation state
pub struct CleanupScheduler {
    moderation: ModerationService,
    interval: Duration,
}

impl CleanupScheduler {
    pub fn new(moderation: ModerationService, interval: Duration) -> Self {
        Self { moderation, interval }
    }

    /// Spawn the sweep loop on the runtime; runs until the process exits
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "cleanup scheduler started");
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick fires immediately; skip it so startup stays quiet.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match self.moderation.purge_stale_rejections().await {
                    Ok(_) => {}
                    Err(err) => error!(error = %err, "cleanup sweep failed"),
                }
            }
        })
    }
}
