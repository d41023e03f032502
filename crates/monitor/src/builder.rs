use crate::capacity;
use crate::config::ProviderConfig;
use crate::pricing;
use shared::models::ask::{Ask, DeviceStatus};
use shared::models::device::DeviceStats;

/// Composes one telemetry snapshot with the provider's static metadata into
/// the Ask/DeviceStatus pair that gets published for a device. Pure; all
/// I/O stays in the stores.
pub struct AskBuilder {
    config: ProviderConfig,
}

impl AskBuilder {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// Composed device identity, e.g. `provider1_gpu0`.
    pub fn device_id(&self, device_index: u32) -> String {
        format!("{}_gpu{}", self.config.provider_id, device_index)
    }

    /// Both records share the given timestamp so readers can correlate a
    /// status snapshot with the ask derived from it.
    pub fn build(
        &self,
        device_index: u32,
        stats: &DeviceStats,
        timestamp: u64,
    ) -> (Ask, DeviceStatus) {
        let price = pricing::adjust_price(self.config.base_price, stats.utilization);
        let credit_rate = pricing::credit_rate(&self.config.gpu_type, &self.config.model);
        let available_tokens =
            capacity::available_tokens(stats.memory_free(), self.config.tokens_per_gb);
        let provider_id = self.device_id(device_index);

        let ask = Ask {
            provider_id: provider_id.clone(),
            model: self.config.model.clone(),
            gpu_type: self.config.gpu_type.clone(),
            price,
            credit_rate,
            max_latency: self.config.max_latency,
            available_tokens,
            last_heartbeat: timestamp,
            capabilities: self.config.capabilities,
        };

        let status = DeviceStatus {
            provider_id,
            model: self.config.model.clone(),
            gpu_type: self.config.gpu_type.clone(),
            utilization: stats.utilization,
            memory_used: stats.memory_used,
            memory_total: stats.memory_total,
            price,
            credit_rate,
            available_tokens,
            last_heartbeat: timestamp,
        };

        (ask, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_build_derives_price_and_capacity() {
        let builder = AskBuilder::new(test_config());
        let stats = DeviceStats::new(95.0, 10.0, 80.0);

        let (ask, status) = builder.build(0, &stats, 1_700_000_000);

        assert_eq!(ask.provider_id, "provider1_gpu0");
        assert_eq!(ask.model, "gpt4");
        assert_eq!(ask.gpu_type, "a100");
        assert_eq!(ask.price.to_string(), "0.00200000");
        assert_eq!(ask.credit_rate.to_string(), "0.01500000");
        assert_eq!(ask.available_tokens, 70_000_000_000);
        assert_eq!(ask.last_heartbeat, 1_700_000_000);

        assert_eq!(status.provider_id, "provider1_gpu0");
        assert_eq!(status.utilization, 95.0);
        assert_eq!(status.memory_used, 10.0);
        assert_eq!(status.memory_total, 80.0);
        assert_eq!(status.price, ask.price);
        assert_eq!(status.credit_rate, ask.credit_rate);
        assert_eq!(status.last_heartbeat, ask.last_heartbeat);
    }

    #[test]
    fn test_build_is_deterministic_for_same_input() {
        let builder = AskBuilder::new(test_config());
        let stats = DeviceStats::new(50.0, 30.0, 80.0);

        let (first_ask, first_status) = builder.build(1, &stats, 1_700_000_000);
        let (second_ask, second_status) = builder.build(1, &stats, 1_700_000_060);

        // Identical payloads except the heartbeat timestamp
        let mut second_ask = second_ask;
        second_ask.last_heartbeat = first_ask.last_heartbeat;
        assert_eq!(first_ask, second_ask);

        let mut second_status = second_status;
        second_status.last_heartbeat = first_status.last_heartbeat;
        assert_eq!(first_status, second_status);
    }

    #[test]
    fn test_device_index_in_identity() {
        let builder = AskBuilder::new(test_config());
        assert_eq!(builder.device_id(3), "provider1_gpu3");
    }
}
