//! Bid records.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use gigboard_models::{Bid, BidId, BidStatus, GigId, UserId};

use crate::error::{StoreError, StoreResult};

type BidRow = (String, String, String, String, i64, String, DateTime<Utc>);

fn from_row(row: BidRow) -> StoreResult<Bid> {
    let (id, gig_id, freelancer_id, message, price, status, created_at) = row;
    let status = status.parse::<BidStatus>().map_err(StoreError::decode)?;
    Ok(Bid {
        id: BidId::from_string(id),
        gig_id: GigId::from_string(gig_id),
        freelancer_id: UserId::from_string(freelancer_id),
        message,
        price,
        status,
        created_at,
    })
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, bid: &Bid) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO bids (id, gig_id, freelancer_id, message, price, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(bid.id.as_str())
    .bind(bid.gig_id.as_str())
    .bind(bid.freelancer_id.as_str())
    .bind(&bid.message)
    .bind(bid.price)
    .bind(bid.status.as_str())
    .bind(bid.created_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: &BidId) -> StoreResult<Option<Bid>> {
    let row: Option<BidRow> = sqlx::query_as(
        "SELECT id, gig_id, freelancer_id, message, price, status, created_at \
         FROM bids WHERE id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(ex)
    .await?;
    row.map(from_row).transpose()
}

/// Find a bid only if it references the given gig.
pub async fn find_for_gig<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &BidId,
    gig_id: &GigId,
) -> StoreResult<Option<Bid>> {
    let row: Option<BidRow> = sqlx::query_as(
        "SELECT id, gig_id, freelancer_id, message, price, status, created_at \
         FROM bids WHERE id = ? AND gig_id = ?",
    )
    .bind(id.as_str())
    .bind(gig_id.as_str())
    .fetch_optional(ex)
    .await?;
    row.map(from_row).transpose()
}

pub async fn list_for_gig<'e>(
    ex: impl SqliteExecutor<'e>,
    gig_id: &GigId,
) -> StoreResult<Vec<Bid>> {
    let rows: Vec<BidRow> = sqlx::query_as(
        "SELECT id, gig_id, freelancer_id, message, price, status, created_at \
         FROM bids WHERE gig_id = ? ORDER BY created_at",
    )
    .bind(gig_id.as_str())
    .fetch_all(ex)
    .await?;
    rows.into_iter().map(from_row).collect()
}

/// Set a bid to `hired` only while it is still `pending` on the given gig.
///
/// Returns the matched-row count: zero means the bid was already resolved.
pub async fn hire_if_pending<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &BidId,
    gig_id: &GigId,
) -> StoreResult<u64> {
    let result = sqlx::query(
        "UPDATE bids SET status = 'hired' \
         WHERE id = ? AND gig_id = ? AND status = 'pending'",
    )
    .bind(id.as_str())
    .bind(gig_id.as_str())
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Reject every bid on `gig_id` other than `keep` that is not already
/// rejected. Idempotent; returns the number of rows changed.
pub async fn reject_siblings<'e>(
    ex: impl SqliteExecutor<'e>,
    gig_id: &GigId,
    keep: &BidId,
) -> StoreResult<u64> {
    let result = sqlx::query(
        "UPDATE bids SET status = 'rejected' \
         WHERE gig_id = ? AND id <> ? AND status <> 'rejected'",
    )
    .bind(gig_id.as_str())
    .bind(keep.as_str())
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gig_repo, user_repo, Store};
    use gigboard_models::{Gig, User};

    async fn seed_gig(store: &Store) -> (UserId, GigId) {
        let owner = User::new("Owner", "owner@example.com", "d");
        let freelancer = User::new("Freelancer", "free@example.com", "d");
        user_repo::insert(store.pool(), &owner).await.unwrap();
        user_repo::insert(store.pool(), &freelancer).await.unwrap();
        let gig = Gig::new(owner.id.clone(), "Logo", "", 500);
        gig_repo::insert(store.pool(), &gig).await.unwrap();
        (freelancer.id, gig.id)
    }

    #[tokio::test]
    async fn test_hire_if_pending_guard() {
        let store = Store::in_memory().await.unwrap();
        let (freelancer, gig_id) = seed_gig(&store).await;
        let bid = Bid::new(gig_id.clone(), freelancer, "pick me", 450);
        insert(store.pool(), &bid).await.unwrap();

        assert_eq!(hire_if_pending(store.pool(), &bid.id, &gig_id).await.unwrap(), 1);
        assert_eq!(hire_if_pending(store.pool(), &bid.id, &gig_id).await.unwrap(), 0);

        // A bid that references a different gig never matches.
        let other_gig = GigId::from_string("other");
        assert_eq!(
            hire_if_pending(store.pool(), &bid.id, &other_gig).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_reject_siblings_is_idempotent() {
        let store = Store::in_memory().await.unwrap();
        let (freelancer, gig_id) = seed_gig(&store).await;
        let keep = Bid::new(gig_id.clone(), freelancer.clone(), "first", 450);
        let other_a = Bid::new(gig_id.clone(), freelancer.clone(), "second", 400);
        let other_b = Bid::new(gig_id.clone(), freelancer, "third", 350);
        for bid in [&keep, &other_a, &other_b] {
            insert(store.pool(), bid).await.unwrap();
        }

        assert_eq!(reject_siblings(store.pool(), &gig_id, &keep.id).await.unwrap(), 2);
        // Second pass changes nothing.
        assert_eq!(reject_siblings(store.pool(), &gig_id, &keep.id).await.unwrap(), 0);

        let bids = list_for_gig(store.pool(), &gig_id).await.unwrap();
        for bid in bids {
            if bid.id == keep.id {
                assert_eq!(bid.status, BidStatus::Pending);
            } else {
                assert_eq!(bid.status, BidStatus::Rejected);
            }
        }
    }
}
