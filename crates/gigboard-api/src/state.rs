//! Application state.

use std::sync::Arc;

use gigboard_realtime::EventBus;
use gigboard_store::Store;

use crate::auth::TokenKeys;
use crate::config::ApiConfig;
use crate::services::{BidService, GigService, HireService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Store,
    pub bus: Arc<EventBus>,
    pub keys: TokenKeys,
    pub gigs: GigService,
    pub bids: BidService,
    pub hiring: HireService,
}

impl AppState {
    /// Connect the store and wire up the services.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = Store::connect(&config.database_url).await?;
        store.migrate().await?;
        Ok(Self::with_store(config, store))
    }

    /// Build state on an existing store. The event bus is constructed here
    /// and injected into every service that publishes.
    pub fn with_store(config: ApiConfig, store: Store) -> Self {
        let bus = Arc::new(EventBus::new());
        let keys = TokenKeys::new(&config.jwt_secret, config.token_ttl_secs);

        let gigs = GigService::new(store.clone(), Arc::clone(&bus));
        let bids = BidService::new(store.clone(), Arc::clone(&bus));
        let hiring = HireService::new(store.clone(), Arc::clone(&bus));

        Self {
            config,
            store,
            bus,
            keys,
            gigs,
            bids,
            hiring,
        }
    }
}
