use crate::builder::AskBuilder;
use crate::config::ProviderConfig;
use crate::payout;
use crate::store::core::StoreContext;
use crate::telemetry::DeviceStatsProvider;
use log::{error, info, warn};
use shared::models::device::DeviceStats;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("device telemetry unavailable")]
    TelemetryUnavailable,
    #[error("ask refresh failed for {failed} of {total} device(s)")]
    StoreWriteFailed { failed: usize, total: usize },
}

/// Runs one publication cycle per poll tick: telemetry in, one atomic
/// Ask/DeviceStatus write per device out, then a best-effort earnings check.
pub struct AskPublisher {
    config: ProviderConfig,
    builder: AskBuilder,
    store_context: Arc<StoreContext>,
    stats_provider: Arc<dyn DeviceStatsProvider>,
}

impl AskPublisher {
    pub fn new(
        config: ProviderConfig,
        store_context: Arc<StoreContext>,
        stats_provider: Arc<dyn DeviceStatsProvider>,
    ) -> Self {
        let builder = AskBuilder::new(config.clone());
        Self {
            config,
            builder,
            store_context,
            stats_provider,
        }
    }

    /// Refresh the advertisement pair for every reported device. Missing or
    /// empty telemetry aborts the cycle without touching the store: stale
    /// advertisements are safer than erased ones, and the TTL handles a
    /// persistent outage. One device's write failure does not stop the
    /// remaining devices; the cycle reports failure if any did.
    pub async fn publish(
        &self,
        stats: Option<Vec<DeviceStats>>,
    ) -> Result<usize, PublishError> {
        let stats = stats.filter(|s| !s.is_empty());
        let Some(stats) = stats else {
            return Err(PublishError::TelemetryUnavailable);
        };

        let total = stats.len();
        let mut failed = 0;
        for (index, device) in stats.iter().enumerate() {
            let now = chrono::Utc::now().timestamp() as u64;
            let (ask, status) = self.builder.build(index as u32, device, now);
            if let Err(e) = self.store_context.ask_store.publish_pair(&ask, &status).await {
                error!("Failed to refresh ask for {}: {e}", ask.provider_id);
                failed += 1;
            }
        }

        // Advertisement publication is the primary contract; the payout
        // check must never flip its result.
        if let Err(e) = self.check_payout().await {
            warn!("Skipping payout check this cycle: {e}");
        }

        if failed > 0 {
            Err(PublishError::StoreWriteFailed { failed, total })
        } else {
            Ok(total)
        }
    }

    /// Read the externally-owned ledger and emit a payout request when the
    /// pending balance reaches the configured threshold. An unavailable
    /// ledger skips the check; it is not the same as a zero balance. A
    /// failed emission is retried naturally on the next cycle because the
    /// pending balance only moves when a payout settles.
    async fn check_payout(&self) -> anyhow::Result<()> {
        let earnings = self
            .store_context
            .earnings_store
            .get_earnings(&self.config.provider_id)
            .await?;

        if let Some(amount) = payout::check_threshold(&earnings, self.config.payout_threshold) {
            let request = self
                .store_context
                .payout_store
                .request_payout(&self.config.provider_id, amount)
                .await?;
            info!(
                "Payout threshold reached, requested payout of {} credits",
                request.amount
            );
        }
        Ok(())
    }

    /// Cooperative polling loop: one cycle per tick with no overlap between
    /// cycles. Nothing here is fatal; a failed cycle waits for the next tick.
    pub async fn run(&self, cancellation_token: CancellationToken) {
        let mut interval = interval(Duration::from_secs(self.config.poll_interval));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let stats = self.stats_provider.collect();
                    match self.publish(stats).await {
                        Ok(count) => info!("Refreshed asks for {count} device(s)"),
                        Err(e) => error!("Publish cycle failed: {e}"),
                    }
                }
                _ = cancellation_token.cancelled() => {
                    info!("Ask publisher received cancellation signal");
                    break;
                }
            }
        }
    }
}
