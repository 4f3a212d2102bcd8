use serde::{Deserialize, Serialize};

/// One pull request awaiting review, as returned by the list endpoint.
///
/// `pr_id` is unique within any one list response and stable for the
/// lifetime of the review. `summary` is backend-generated prose and is
/// opaque to the client: it is rendered verbatim, never transformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrSummary {
    pub pr_id: i64,
    pub summary: String,
}
