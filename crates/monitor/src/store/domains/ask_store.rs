use crate::store::core::RedisStore;
use anyhow::Result;
use redis::AsyncCommands;
use shared::models::ask::{Ask, DeviceStatus};
use std::sync::Arc;

/// Advertisements must be refreshed within this window or readers treat the
/// device as offline. Key absence is the only liveness signal.
pub const ASK_TTL_SECS: u64 = 120;

pub fn ask_key(device_id: &str, model: &str) -> String {
    format!("ask:{device_id}:{model}")
}

pub fn status_key(device_id: &str) -> String {
    format!("provider:status:{device_id}")
}

pub struct AskStore {
    redis: Arc<RedisStore>,
}

impl AskStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    /// Write an ask and its companion status in one MULTI/EXEC batch so a
    /// concurrent reader never observes one without the other. Both keys
    /// carry the same TTL and are simply overwritten on the next cycle.
    pub async fn publish_pair(&self, ask: &Ask, status: &DeviceStatus) -> Result<()> {
        let ask_payload = serde_json::to_string(ask)?;
        let status_payload = serde_json::to_string(status)?;

        let mut con = self.redis.client.get_multiplexed_async_connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.set_ex(
            ask_key(&ask.provider_id, &ask.model),
            ask_payload,
            ASK_TTL_SECS,
        );
        pipe.set_ex(status_key(&status.provider_id), status_payload, ASK_TTL_SECS);
        pipe.query_async::<()>(&mut con).await?;
        Ok(())
    }

    pub async fn get_ask(&self, device_id: &str, model: &str) -> Result<Option<Ask>> {
        let mut con = self.redis.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = con.get(ask_key(device_id, model)).await?;
        value
            .map(|raw| serde_json::from_str(&raw).map_err(Into::into))
            .transpose()
    }

    pub async fn get_status(&self, device_id: &str) -> Result<Option<DeviceStatus>> {
        let mut con = self.redis.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = con.get(status_key(device_id)).await?;
        value
            .map(|raw| serde_json::from_str(&raw).map_err(Into::into))
            .transpose()
    }
}
