pub mod review;
pub mod summary;

pub use review::{Decision, ReviewItem, ReviewState};
pub use summary::PrSummary;
