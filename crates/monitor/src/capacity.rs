/// Default estimation ratio: 1 GB of free memory serves roughly 1B tokens
/// of a 7B-class model.
pub const DEFAULT_TOKENS_PER_GB: u64 = 1_000_000_000;

/// Advertised token capacity for a given amount of free device memory.
/// Telemetry can transiently report more memory used than the device total;
/// the estimate clamps at zero rather than going negative.
pub fn available_tokens(memory_free: f64, tokens_per_gb: u64) -> u64 {
    if memory_free <= 0.0 {
        return 0;
    }
    (memory_free * tokens_per_gb as f64) as u64
}
