use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accumulated earnings for a provider, one record per provider (not per
/// device). Owned and mutated by the external accounting system; the monitor
/// only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Earnings {
    pub total_credits: Decimal,
    pub pending_payout: Decimal,
    pub last_payout: u64,
    pub total_inference_count: u64,
}

impl Earnings {
    /// Zero-valued ledger for a provider that has not earned anything yet.
    pub fn empty(now: u64) -> Self {
        Self {
            total_credits: Decimal::ZERO,
            pending_payout: Decimal::ZERO,
            last_payout: now,
            total_inference_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayoutRequestStatus {
    #[default]
    Pending,
    Settled,
    Rejected,
}

impl fmt::Display for PayoutRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoutRequestStatus::Pending => write!(f, "pending"),
            PayoutRequestStatus::Settled => write!(f, "settled"),
            PayoutRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A settlement request appended to the provider's durable payout list.
/// Created in `pending`; transitions out of `pending` belong to the external
/// payout processor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayoutRequest {
    pub provider_id: String,
    pub amount: Decimal,
    pub timestamp: u64,
    pub status: PayoutRequestStatus,
}

impl PayoutRequest {
    pub fn new(provider_id: &str, amount: Decimal, timestamp: u64) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            amount,
            timestamp,
            status: PayoutRequestStatus::Pending,
        }
    }
}

impl fmt::Display for PayoutRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap())
    }
}
