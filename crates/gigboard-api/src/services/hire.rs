//! The hire transition.
//!
//! Moves a gig from `open` to `assigned` and one bid from `pending` to
//! `hired` while rejecting every sibling bid, all inside one transaction.
//! Competing hires are decided by the store's conditional updates: the
//! loser's update matches zero rows and its transaction rolls back, so no
//! in-process lock is needed.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use gigboard_models::{Bid, BidId, Gig, GigId, ServerEvent, UserId};
use gigboard_realtime::{EventBus, Room};
use gigboard_store::{bid_repo, gig_repo, Store};

use crate::error::{ApiError, ApiResult};

/// Result of a successful hire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HireOutcome {
    pub gig: Gig,
    pub bid: Bid,
}

/// Coordinates the hire transaction and its notification.
#[derive(Clone)]
pub struct HireService {
    store: Store,
    bus: Arc<EventBus>,
}

impl HireService {
    pub fn new(store: Store, bus: Arc<EventBus>) -> Self {
        Self { store, bus }
    }

    /// Hire `bid_id` on `gig_id` on behalf of `requester_id`.
    ///
    /// Fails with `NotFound` when the gig or bid is absent (or the bid
    /// references another gig), `Forbidden` when the requester is not the
    /// owner, and `Conflict` when a competing hire already resolved the gig
    /// or the bid. Any failure leaves every record untouched.
    pub async fn hire(
        &self,
        gig_id: &GigId,
        bid_id: &BidId,
        requester_id: &UserId,
    ) -> ApiResult<HireOutcome> {
        let mut tx = self.store.begin().await?;

        let gig = gig_repo::find_by_id(&mut *tx, gig_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Gig not found"))?;
        if gig.owner_id != *requester_id {
            return Err(ApiError::forbidden("You are not the owner of this gig"));
        }

        bid_repo::find_for_gig(&mut *tx, bid_id, gig_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Bid not found"))?;

        // Both guards are conditioned on the expected prior state; a zero
        // match means a competing hire won and this transaction unwinds.
        if gig_repo::assign_if_open(&mut *tx, gig_id, requester_id).await? == 0 {
            return Err(ApiError::conflict("Gig is already assigned"));
        }
        if bid_repo::hire_if_pending(&mut *tx, bid_id, gig_id).await? == 0 {
            return Err(ApiError::conflict("Bid is no longer available for hiring"));
        }
        let rejected = bid_repo::reject_siblings(&mut *tx, gig_id, bid_id).await?;

        tx.commit().await.map_err(gigboard_store::StoreError::from)?;
        info!(gig = %gig_id, bid = %bid_id, rejected, "hire committed");

        let bid = bid_repo::find_by_id(self.store.pool(), bid_id)
            .await?
            .ok_or_else(|| ApiError::internal("Hired bid missing after commit"))?;
        let gig = gig.assign();

        // Best-effort: delivery problems never affect the committed hire.
        let bus = Arc::clone(&self.bus);
        let event = ServerEvent::freelancer_hired(&gig.title, gig.id.clone(), bid.id.clone());
        let room = Room::user(bid.freelancer_id.clone());
        tokio::spawn(async move {
            bus.publish(&room, event).await;
        });

        Ok(HireOutcome { gig, bid })
    }
}
