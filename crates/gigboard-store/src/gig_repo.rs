//! Gig records.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use gigboard_models::{Gig, GigId, GigStatus, GigSummary, UserId};

use crate::error::{StoreError, StoreResult};

type GigRow = (
    String,
    String,
    String,
    String,
    i64,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn from_row(row: GigRow) -> StoreResult<Gig> {
    let (id, owner_id, title, description, budget, status, created_at, updated_at) = row;
    let status = status.parse::<GigStatus>().map_err(StoreError::decode)?;
    Ok(Gig {
        id: GigId::from_string(id),
        owner_id: UserId::from_string(owner_id),
        title,
        description,
        budget,
        status,
        created_at,
        updated_at,
    })
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, gig: &Gig) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO gigs (id, owner_id, title, description, budget, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(gig.id.as_str())
    .bind(gig.owner_id.as_str())
    .bind(&gig.title)
    .bind(&gig.description)
    .bind(gig.budget)
    .bind(gig.status.as_str())
    .bind(gig.created_at)
    .bind(gig.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: &GigId) -> StoreResult<Option<Gig>> {
    let row: Option<GigRow> = sqlx::query_as(
        "SELECT id, owner_id, title, description, budget, status, created_at, updated_at \
         FROM gigs WHERE id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(ex)
    .await?;
    row.map(from_row).transpose()
}

/// All gigs, newest first, each with its bid count.
pub async fn list_with_bid_counts<'e>(ex: impl SqliteExecutor<'e>) -> StoreResult<Vec<GigSummary>> {
    let rows: Vec<(
        String,
        String,
        String,
        String,
        i64,
        String,
        DateTime<Utc>,
        DateTime<Utc>,
        i64,
    )> = sqlx::query_as(
        "SELECT g.id, g.owner_id, g.title, g.description, g.budget, g.status, \
                g.created_at, g.updated_at, COUNT(b.id) \
         FROM gigs g LEFT JOIN bids b ON b.gig_id = g.id \
         GROUP BY g.id ORDER BY g.created_at DESC",
    )
    .fetch_all(ex)
    .await?;

    rows.into_iter()
        .map(|row| {
            let (id, owner_id, title, description, budget, status, created_at, updated_at, bids) =
                row;
            let gig = from_row((
                id, owner_id, title, description, budget, status, created_at, updated_at,
            ))?;
            Ok(GigSummary {
                gig,
                bid_count: bids,
            })
        })
        .collect()
}

/// Overwrite the owner-editable fields, keeping the stored value where the
/// caller passes `None`. Returns the matched-row count.
pub async fn update_details<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &GigId,
    title: Option<&str>,
    description: Option<&str>,
    budget: Option<i64>,
) -> StoreResult<u64> {
    let result = sqlx::query(
        "UPDATE gigs SET title = COALESCE(?, title), \
                         description = COALESCE(?, description), \
                         budget = COALESCE(?, budget), \
                         updated_at = ? \
         WHERE id = ?",
    )
    .bind(title)
    .bind(description)
    .bind(budget)
    .bind(Utc::now())
    .bind(id.as_str())
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Set a gig to `assigned` only while it is still `open` and owned by
/// `owner_id`.
///
/// Returns the matched-row count: zero means the caller lost the race (or
/// never owned the gig) and nothing changed.
pub async fn assign_if_open<'e>(
    ex: impl SqliteExecutor<'e>,
    id: &GigId,
    owner_id: &UserId,
) -> StoreResult<u64> {
    let result = sqlx::query(
        "UPDATE gigs SET status = 'assigned', updated_at = ? \
         WHERE id = ? AND owner_id = ? AND status = 'open'",
    )
    .bind(Utc::now())
    .bind(id.as_str())
    .bind(owner_id.as_str())
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete<'e>(ex: impl SqliteExecutor<'e>, id: &GigId) -> StoreResult<u64> {
    let result = sqlx::query("DELETE FROM gigs WHERE id = ?")
        .bind(id.as_str())
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
