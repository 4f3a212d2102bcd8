use std::fmt;

use serde::{Deserialize, Serialize};

use crate::summary::PrSummary;

/// The two decision command kinds a reviewer can issue for a PR.
///
/// `as_str` doubles as the command path segment on the wire
/// (`POST /pr/{pr_id}/approve` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Decision::Approve => "Approve",
            Decision::Reject => "Reject",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Decision::Approve => "Approved",
            Decision::Reject => "Rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Client-side status of one summary under review.
///
/// A summary whose command succeeds leaves the pending collection
/// entirely, so there is no terminal "decided" variant here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// No decision dispatched; triggers armed.
    Pending,
    /// A command is outstanding; triggers disarmed until the outcome lands.
    InFlight(Decision),
    /// The last command failed; triggers re-armed, reason shown on the card.
    Failed { decision: Decision, reason: String },
}

impl ReviewState {
    /// Whether a new decision command may be dispatched for this item.
    pub fn is_actionable(&self) -> bool {
        matches!(self, ReviewState::Pending | ReviewState::Failed { .. })
    }

    pub fn in_flight(&self) -> bool {
        matches!(self, ReviewState::InFlight(_))
    }
}

/// One entry of the controller's local collection: the backend's summary
/// plus the client-side decision lifecycle attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub summary: PrSummary,
    pub state: ReviewState,
}

impl ReviewItem {
    pub fn pending(summary: PrSummary) -> Self {
        Self {
            summary,
            state: ReviewState::Pending,
        }
    }

    pub fn pr_id(&self) -> i64 {
        self.summary.pr_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_path_segments() {
        assert_eq!(Decision::Approve.as_str(), "approve");
        assert_eq!(Decision::Reject.as_str(), "reject");
    }

    #[test]
    fn decision_display() {
        assert_eq!(Decision::Approve.to_string(), "Approve");
        assert_eq!(Decision::Reject.past_tense(), "Rejected");
    }

    #[test]
    fn pending_and_failed_are_actionable() {
        assert!(ReviewState::Pending.is_actionable());
        assert!(ReviewState::Failed {
            decision: Decision::Approve,
            reason: "backend returned 500".into(),
        }
        .is_actionable());
    }

    #[test]
    fn in_flight_is_not_actionable() {
        let state = ReviewState::InFlight(Decision::Reject);
        assert!(!state.is_actionable());
        assert!(state.in_flight());
    }

    #[test]
    fn item_starts_pending() {
        let item = ReviewItem::pending(PrSummary {
            pr_id: 7,
            summary: "Fix bug".into(),
        });
        assert_eq!(item.pr_id(), 7);
        assert_eq!(item.state, ReviewState::Pending);
    }
}
