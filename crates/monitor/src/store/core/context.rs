use crate::store::core::RedisStore;
use crate::store::domains::ask_store::AskStore;
use crate::store::domains::earnings_store::EarningsStore;
use crate::store::domains::payout_store::PayoutStore;
use std::sync::Arc;

/// Bundle of the domain stores, all backed by one shared [`RedisStore`]
/// handle injected at construction time.
pub struct StoreContext {
    pub ask_store: Arc<AskStore>,
    pub earnings_store: Arc<EarningsStore>,
    pub payout_store: Arc<PayoutStore>,
}

impl StoreContext {
    pub fn new(store: Arc<RedisStore>) -> Self {
        Self {
            ask_store: Arc::new(AskStore::new(store.clone())),
            earnings_store: Arc::new(EarningsStore::new(store.clone())),
            payout_store: Arc::new(PayoutStore::new(store.clone())),
        }
    }
}
