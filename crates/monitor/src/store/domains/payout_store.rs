use crate::store::core::RedisStore;
use anyhow::Result;
use log::warn;
use redis::AsyncCommands;
use rust_decimal::Decimal;
use shared::models::earnings::PayoutRequest;
use std::sync::Arc;

const PROVIDER_PAYOUTS_KEY: &str = "provider:payouts";

/// Channel any listening payout processor subscribes to.
pub const PAYOUT_REQUEST_CHANNEL: &str = "payouts:requests";

fn payouts_key(provider_id: &str) -> String {
    format!("{PROVIDER_PAYOUTS_KEY}:{provider_id}")
}

pub struct PayoutStore {
    redis: Arc<RedisStore>,
}

impl PayoutStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    /// Durably record a pending payout request, then notify the payout
    /// processor. The append must succeed. The notification is best-effort:
    /// a publish failure after a successful append leaves the durable record
    /// in place for whatever reconciles the list against settled payouts.
    pub async fn request_payout(&self, provider_id: &str, amount: Decimal) -> Result<PayoutRequest> {
        let request = PayoutRequest::new(
            provider_id,
            amount,
            chrono::Utc::now().timestamp() as u64,
        );
        let payload = serde_json::to_string(&request)?;

        let mut con = self.redis.client.get_multiplexed_async_connection().await?;
        let _: () = con.rpush(payouts_key(provider_id), &payload).await?;

        if let Err(e) = con
            .publish::<_, _, ()>(PAYOUT_REQUEST_CHANNEL, &payload)
            .await
        {
            warn!("Payout request for {provider_id} recorded but notification failed: {e}");
        }

        Ok(request)
    }

    pub async fn get_requests(&self, provider_id: &str) -> Result<Vec<PayoutRequest>> {
        let mut con = self.redis.client.get_multiplexed_async_connection().await?;
        let raw_requests: Vec<String> = con.lrange(payouts_key(provider_id), 0, -1).await?;
        raw_requests
            .iter()
            .map(|raw| serde_json::from_str(raw).map_err(Into::into))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use rust_decimal_macros::dec;
    use shared::models::earnings::PayoutRequestStatus;

    #[tokio::test]
    async fn test_request_appends_pending_record() {
        let store = PayoutStore::new(Arc::new(RedisStore::new_test()));

        let request = store.request_payout("provider1", dec!(100.00)).await.unwrap();
        assert_eq!(request.status, PayoutRequestStatus::Pending);
        assert_eq!(request.amount, dec!(100.00));

        let requests = store.get_requests("provider1").await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], request);
    }

    #[tokio::test]
    async fn test_repeat_requests_accumulate() {
        // The list is append-only; de-duplication of repeated crossings is
        // the payout processor's job.
        let store = PayoutStore::new(Arc::new(RedisStore::new_test()));
        store.request_payout("provider1", dec!(100.00)).await.unwrap();
        store.request_payout("provider1", dec!(105.25)).await.unwrap();

        let requests = store.get_requests("provider1").await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].amount, dec!(105.25));
    }

    #[tokio::test]
    async fn test_request_notifies_channel() {
        let redis = Arc::new(RedisStore::new_test());
        let store = PayoutStore::new(redis.clone());

        let mut pubsub = redis.client.get_async_pubsub().await.unwrap();
        pubsub.subscribe(PAYOUT_REQUEST_CHANNEL).await.unwrap();

        let request = store.request_payout("provider1", dec!(100.00)).await.unwrap();

        let message = pubsub.on_message().next().await.unwrap();
        let payload: String = message.get_payload().unwrap();
        let notified: PayoutRequest = serde_json::from_str(&payload).unwrap();
        assert_eq!(notified, request);
    }

    #[tokio::test]
    async fn test_requests_scoped_per_provider() {
        let store = PayoutStore::new(Arc::new(RedisStore::new_test()));
        store.request_payout("provider1", dec!(100.00)).await.unwrap();

        let requests = store.get_requests("provider2").await.unwrap();
        assert!(requests.is_empty());
    }
}
