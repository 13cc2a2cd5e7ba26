//! SQLite persistence gateway.
//!
//! Repositories expose plain reads and writes plus state-guarded
//! conditional updates that report matched-row counts, so callers can build
//! optimistic concurrency on top without read-modify-write races. All
//! functions are generic over a SQLite executor and work equally against
//! the pool or inside a transaction.

pub mod bid_repo;
pub mod error;
pub mod gig_repo;
mod store;
pub mod user_repo;

pub use error::{StoreError, StoreResult};
pub use store::Store;
