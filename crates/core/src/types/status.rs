//! Design review status and its transition rules.
//!
//! ```text
//! draft ──► pending ──► approved ──► in_production ──► completed
//!               │
//!               └─────► rejected
//! ```
//!
//! Every handler that changes a status goes through [`transition`], so the
//! server rejects the same moves the admin UI hides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Review status of a customer design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "design_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DesignStatus {
    /// Saved by the customer, not yet submitted.
    #[default]
    Draft,
    /// Submitted and waiting for review.
    Pending,
    /// Accepted by the shop.
    Approved,
    /// Declined by the shop or the customer.
    Rejected,
    /// Being produced.
    InProduction,
    /// Produced and shipped.
    Completed,
}

/// A status change that the workflow does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move design from {from} to {to}")]
pub struct InvalidTransition {
    /// Status the design is currently in.
    pub from: DesignStatus,
    /// Status that was requested.
    pub to: DesignStatus,
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown design status: {0}")]
pub struct UnknownStatus(pub String);

impl DesignStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Draft,
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::InProduction,
        Self::Completed,
    ];

    /// Statuses reachable in one step from `self`.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Pending],
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::InProduction],
            Self::InProduction => &[Self::Completed],
            Self::Rejected | Self::Completed => &[],
        }
    }

    /// Whether `self -> next` is a legal move.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether no further transitions exist.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Move to `requested`, or explain why not.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] for any move not listed in
    /// [`allowed_transitions`](Self::allowed_transitions), including
    /// requests for the current status.
    pub fn transition(self, requested: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(requested) {
            Ok(requested)
        } else {
            Err(InvalidTransition {
                from: self,
                to: requested,
            })
        }
    }

    /// Wire value stored in metaobject fields and the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::InProduction => "in_production",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::InProduction => "In Production",
            Self::Completed => "Completed",
        }
    }
}

/// Free-function form of [`DesignStatus::transition`].
///
/// # Errors
///
/// Returns [`InvalidTransition`] when the move is not allowed.
pub fn transition(
    current: DesignStatus,
    requested: DesignStatus,
) -> Result<DesignStatus, InvalidTransition> {
    current.transition(requested)
}

impl fmt::Display for DesignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesignStatus {
    type Err = UnknownStatus;

    /// Accepts any case and `-` or space in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let status = DesignStatus::Draft;
        let status = transition(status, DesignStatus::Pending).unwrap();
        let status = transition(status, DesignStatus::Approved).unwrap();
        let status = transition(status, DesignStatus::InProduction).unwrap();
        let status = transition(status, DesignStatus::Completed).unwrap();
        assert!(status.is_terminal());
    }

    #[test]
    fn test_rejection_is_terminal() {
        let status = transition(DesignStatus::Pending, DesignStatus::Rejected).unwrap();
        assert!(status.is_terminal());
        assert!(transition(status, DesignStatus::Approved).is_err());
    }

    #[test]
    fn test_illegal_moves() {
        let illegal = [
            (DesignStatus::Draft, DesignStatus::Approved),
            (DesignStatus::Pending, DesignStatus::Completed),
            (DesignStatus::Approved, DesignStatus::Rejected),
            (DesignStatus::Completed, DesignStatus::Pending),
            (DesignStatus::InProduction, DesignStatus::Approved),
        ];
        for (from, to) in illegal {
            assert_eq!(transition(from, to), Err(InvalidTransition { from, to }));
        }
    }

    #[test]
    fn test_same_status_rejected() {
        for status in DesignStatus::ALL {
            assert!(transition(status, status).is_err(), "{status} -> {status}");
        }
    }

    #[test]
    fn test_error_message() {
        let err = transition(DesignStatus::Completed, DesignStatus::Pending).unwrap_err();
        assert_eq!(err.to_string(), "cannot move design from completed to pending");
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("Approved".parse(), Ok(DesignStatus::Approved));
        assert_eq!("in production".parse(), Ok(DesignStatus::InProduction));
        assert_eq!("IN-PRODUCTION".parse(), Ok(DesignStatus::InProduction));
        assert_eq!(
            "shipped".parse::<DesignStatus>(),
            Err(UnknownStatus("shipped".to_string()))
        );
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&DesignStatus::InProduction).unwrap();
        assert_eq!(json, "\"in_production\"");
    }
}
