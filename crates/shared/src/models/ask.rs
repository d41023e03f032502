use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider's advertised willingness to serve work, one per device.
/// `provider_id` carries the composed `{provider}_gpu{index}` device id.
/// Prices serialize as exact decimal strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ask {
    pub provider_id: String,
    pub model: String,
    pub gpu_type: String,
    pub price: Decimal,
    pub credit_rate: Decimal,
    pub max_latency: u32,
    pub available_tokens: u64,
    pub last_heartbeat: u64,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Capabilities {
    pub streaming: bool,
    pub batch: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            streaming: true,
            batch: false,
        }
    }
}

impl fmt::Display for Ask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap())
    }
}

/// Companion record to an [`Ask`]: the raw telemetry snapshot plus the
/// price/rate that was derived from it. Kept under its own key with the same
/// lifetime so matching and observability can evolve independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceStatus {
    pub provider_id: String,
    pub model: String,
    pub gpu_type: String,
    pub utilization: f64,
    pub memory_used: f64,
    pub memory_total: f64,
    pub price: Decimal,
    pub credit_rate: Decimal,
    pub available_tokens: u64,
    pub last_heartbeat: u64,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ask_price_survives_round_trip() {
        let ask = Ask {
            provider_id: "provider1_gpu0".to_string(),
            model: "gpt4".to_string(),
            gpu_type: "a100".to_string(),
            price: Decimal::from_str("0.00200000").unwrap(),
            credit_rate: Decimal::from_str("0.00750000").unwrap(),
            max_latency: 1000,
            available_tokens: 70_000_000_000,
            last_heartbeat: 1_700_000_000,
            capabilities: Capabilities::default(),
        };

        let raw = serde_json::to_string(&ask).unwrap();
        assert!(raw.contains("\"price\":\"0.00200000\""));
        assert!(raw.contains("\"credit_rate\":\"0.00750000\""));

        let parsed: Ask = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, ask);
    }
}
