//! Bid lifecycle service.

use std::sync::Arc;

use tracing::info;

use gigboard_models::{Bid, BidId, Gig, GigId, ServerEvent, UserId};
use gigboard_realtime::{EventBus, Room};
use gigboard_store::{bid_repo, gig_repo, Store};

use crate::error::{ApiError, ApiResult};

/// Bid creation, listing, and sibling rejection.
#[derive(Clone)]
pub struct BidService {
    store: Store,
    bus: Arc<EventBus>,
}

impl BidService {
    pub fn new(store: Store, bus: Arc<EventBus>) -> Self {
        Self { store, bus }
    }

    /// Place a bid against an existing gig.
    ///
    /// The gig must exist but is not required to still be open: a late bid
    /// against an assigned gig lands as `pending` and is rejected on the
    /// next sibling sweep.
    pub async fn create_bid(
        &self,
        gig_id: &GigId,
        freelancer_id: &UserId,
        message: &str,
        price: i64,
    ) -> ApiResult<Bid> {
        let gig = gig_repo::find_by_id(self.store.pool(), gig_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Gig not found"))?;

        let bid = Bid::new(gig.id.clone(), freelancer_id.clone(), message, price);
        bid_repo::insert(self.store.pool(), &bid).await?;
        info!(bid = %bid.id, gig = %gig.id, freelancer = %freelancer_id, "bid created");

        let bus = Arc::clone(&self.bus);
        let event = ServerEvent::new_bid(gig.id.clone(), bid.id.clone());
        let room = Room::gig(gig.id);
        tokio::spawn(async move {
            bus.publish(&room, event).await;
        });

        Ok(bid)
    }

    /// All bids for a gig together with the gig record.
    pub async fn list_bids_for_gig(&self, gig_id: &GigId) -> ApiResult<(Gig, Vec<Bid>)> {
        let gig = gig_repo::find_by_id(self.store.pool(), gig_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Gig not found"))?;
        let bids = bid_repo::list_for_gig(self.store.pool(), gig_id).await?;
        Ok((gig, bids))
    }

    /// Reject every bid on `gig_id` other than `keep_bid_id`.
    ///
    /// Idempotent; safe to re-run as a repair after a partially observed
    /// hire. Returns the number of bids moved to `rejected`.
    pub async fn reject_siblings(&self, gig_id: &GigId, keep_bid_id: &BidId) -> ApiResult<u64> {
        Ok(bid_repo::reject_siblings(self.store.pool(), gig_id, keep_bid_id).await?)
    }
}
