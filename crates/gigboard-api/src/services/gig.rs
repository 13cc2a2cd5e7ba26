//! Gig management service.

use std::sync::Arc;

use tracing::info;

use gigboard_models::{Gig, GigId, GigSummary, ServerEvent, UserId};
use gigboard_realtime::{EventBus, Room};
use gigboard_store::{gig_repo, Store};

use crate::error::{ApiError, ApiResult};

/// Owner-editable fields; `None` keeps the stored value. Status is not
/// editable here: it only moves through a hire.
#[derive(Debug, Default, Clone)]
pub struct GigUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<i64>,
}

/// Gig CRUD with creation announcements.
#[derive(Clone)]
pub struct GigService {
    store: Store,
    bus: Arc<EventBus>,
}

impl GigService {
    pub fn new(store: Store, bus: Arc<EventBus>) -> Self {
        Self { store, bus }
    }

    /// Create a gig and announce it to everyone except the owner.
    pub async fn create_gig(
        &self,
        owner_id: &UserId,
        title: &str,
        description: &str,
        budget: i64,
    ) -> ApiResult<Gig> {
        let gig = Gig::new(owner_id.clone(), title, description, budget);
        gig_repo::insert(self.store.pool(), &gig).await?;
        info!(gig = %gig.id, owner = %owner_id, "gig created");

        let bus = Arc::clone(&self.bus);
        let event = ServerEvent::new_gig(&gig.title, gig.id.clone());
        let owner_room = Room::user(owner_id.clone());
        tokio::spawn(async move {
            bus.publish_except(&Room::AllUsers, &owner_room, event).await;
        });

        Ok(gig)
    }

    /// All gigs with their bid counts, newest first.
    pub async fn list_gigs(&self) -> ApiResult<Vec<GigSummary>> {
        Ok(gig_repo::list_with_bid_counts(self.store.pool()).await?)
    }

    pub async fn get_gig(&self, id: &GigId) -> ApiResult<Gig> {
        gig_repo::find_by_id(self.store.pool(), id)
            .await?
            .ok_or_else(|| ApiError::not_found("Gig not found"))
    }

    /// Edit a gig's details. Owner only.
    pub async fn update_gig(
        &self,
        id: &GigId,
        requester_id: &UserId,
        update: GigUpdate,
    ) -> ApiResult<Gig> {
        let gig = self.get_gig(id).await?;
        if gig.owner_id != *requester_id {
            return Err(ApiError::forbidden("You are not the owner of this gig"));
        }

        gig_repo::update_details(
            self.store.pool(),
            id,
            update.title.as_deref(),
            update.description.as_deref(),
            update.budget,
        )
        .await?;

        self.get_gig(id).await
    }

    /// Delete a gig. Owner only.
    pub async fn delete_gig(&self, id: &GigId, requester_id: &UserId) -> ApiResult<Gig> {
        let gig = self.get_gig(id).await?;
        if gig.owner_id != *requester_id {
            return Err(ApiError::forbidden("You are not the owner of this gig"));
        }

        gig_repo::delete(self.store.pool(), id).await?;
        info!(gig = %id, "gig deleted");
        Ok(gig)
    }
}
