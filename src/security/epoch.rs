//! Periodic epoch reset for the rate governor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant};

use crate::observability::metrics;
use crate::security::rate_limit::RateGovernor;

/// Background task that swaps out the governor's counters every period.
pub struct EpochResetter {
    governor: Arc<RateGovernor>,
    period: Duration,
}

impl EpochResetter {
    pub fn new(governor: Arc<RateGovernor>, period: Duration) -> Self {
        Self { governor, period }
    }

    /// Run until `shutdown` fires or its sender is dropped.
    ///
    /// The first reset happens one full period after start.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(period = ?self.period, "Epoch resetter starting");

        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let discarded = self.governor.reset();
                    metrics::record_epoch_reset(discarded);
                    tracing::debug!(
                        epoch = self.governor.epoch(),
                        discarded_keys = discarded,
                        "Rate counters reset"
                    );
                }
                _ = shutdown.recv() => {
                    tracing::info!("Epoch resetter received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
