use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use shared::models::ask::Capabilities;
use std::str::FromStr;

/// Process-wide provider configuration, validated once at startup and
/// immutable afterwards. An unparseable price or threshold is the one class
/// of error that is allowed to stop the process.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider_id: String,
    pub model: String,
    pub gpu_type: String,
    pub base_price: Decimal,
    pub max_latency: u32,
    pub payout_threshold: Decimal,
    pub poll_interval: u64,
    pub tokens_per_gb: u64,
    pub capabilities: Capabilities,
}

impl ProviderConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider_id: &str,
        model: &str,
        gpu_type: &str,
        base_price: &str,
        max_latency: u32,
        payout_threshold: &str,
        poll_interval: u64,
        tokens_per_gb: u64,
        capabilities: Capabilities,
    ) -> Result<Self> {
        if provider_id.is_empty() {
            bail!("Provider id must not be empty");
        }
        if poll_interval == 0 {
            bail!("Poll interval must be at least one second");
        }

        let base_price = Decimal::from_str(base_price)
            .with_context(|| format!("Invalid base ask price: {base_price}"))?;
        if base_price < Decimal::ZERO {
            bail!("Base ask price must not be negative");
        }

        let payout_threshold = Decimal::from_str(payout_threshold)
            .with_context(|| format!("Invalid payout threshold: {payout_threshold}"))?;
        if payout_threshold <= Decimal::ZERO {
            bail!("Payout threshold must be positive");
        }

        Ok(Self {
            provider_id: provider_id.to_string(),
            model: model.to_string(),
            gpu_type: gpu_type.to_string(),
            base_price,
            max_latency,
            payout_threshold,
            poll_interval,
            tokens_per_gb,
            capabilities,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> ProviderConfig {
    ProviderConfig::new(
        "provider1",
        "gpt4",
        "a100",
        "0.001",
        1000,
        "100.00",
        30,
        crate::capacity::DEFAULT_TOKENS_PER_GB,
        Capabilities::default(),
    )
    .unwrap()
}
