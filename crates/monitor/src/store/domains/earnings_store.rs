use crate::store::core::RedisStore;
use anyhow::{anyhow, Result};
use redis::AsyncCommands;
use shared::models::earnings::Earnings;
use std::sync::Arc;

const PROVIDER_EARNINGS_KEY: &str = "provider:earnings";

fn earnings_key(provider_id: &str) -> String {
    format!("{PROVIDER_EARNINGS_KEY}:{provider_id}")
}

/// Read-only view of the provider ledger. The record is owned and mutated
/// by the external accounting system.
pub struct EarningsStore {
    redis: Arc<RedisStore>,
}

impl EarningsStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    /// A missing record means a provider that has legitimately earned
    /// nothing yet and yields a zero-valued ledger. A connection or parse
    /// failure is "ledger unavailable" and surfaces as an error instead;
    /// callers must not treat it as zero.
    pub async fn get_earnings(&self, provider_id: &str) -> Result<Earnings> {
        let mut con = self
            .redis
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| anyhow!("Ledger unavailable: {e}"))?;
        let value: Option<String> = con
            .get(earnings_key(provider_id))
            .await
            .map_err(|e| anyhow!("Ledger unavailable: {e}"))?;

        match value {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| anyhow!("Ledger record for {provider_id} unreadable: {e}")),
            None => Ok(Earnings::empty(chrono::Utc::now().timestamp() as u64)),
        }
    }

    #[cfg(test)]
    pub async fn set_earnings(&self, provider_id: &str, earnings: &Earnings) -> Result<()> {
        let mut con = self.redis.client.get_multiplexed_async_connection().await?;
        con.set(earnings_key(provider_id), serde_json::to_string(earnings)?)
            .await
            .map_err(|e| anyhow!("Failed to seed earnings: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_missing_record_is_zero_valued() {
        let store = EarningsStore::new(Arc::new(RedisStore::new_test()));
        let before = chrono::Utc::now().timestamp() as u64;

        let earnings = store.get_earnings("provider1").await.unwrap();

        assert_eq!(earnings.total_credits, Decimal::ZERO);
        assert_eq!(earnings.pending_payout, Decimal::ZERO);
        assert_eq!(earnings.total_inference_count, 0);
        assert!(earnings.last_payout >= before);
    }

    #[tokio::test]
    async fn test_existing_record_round_trips() {
        let store = EarningsStore::new(Arc::new(RedisStore::new_test()));
        let seeded = Earnings {
            total_credits: dec!(512.75),
            pending_payout: dec!(120.50),
            last_payout: 1_700_000_000,
            total_inference_count: 9001,
        };
        store.set_earnings("provider1", &seeded).await.unwrap();

        let earnings = store.get_earnings("provider1").await.unwrap();
        assert_eq!(earnings, seeded);
    }

    #[tokio::test]
    async fn test_unparseable_record_is_unavailable_not_zero() {
        let redis = Arc::new(RedisStore::new_test());
        let store = EarningsStore::new(redis.clone());

        let mut con = redis
            .client
            .get_multiplexed_async_connection()
            .await
            .unwrap();
        let _: () = con
            .set(earnings_key("provider1"), "not json")
            .await
            .unwrap();

        assert!(store.get_earnings("provider1").await.is_err());
    }
}
