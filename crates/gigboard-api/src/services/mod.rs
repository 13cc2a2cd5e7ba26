//! Business logic services.

pub mod bid;
pub mod gig;
pub mod hire;

pub use bid::BidService;
pub use gig::{GigService, GigUpdate};
pub use hire::{HireOutcome, HireService};
