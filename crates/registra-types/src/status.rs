//! Lifecycle status enums for offerings and enrollments.
//!
//! Statuses are closed enums rather than free strings: every transition is
//! handled exhaustively in the core, and the database text column round-trips
//! through `as_str`/`parse`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Raised when a status string from the store does not name a known variant.
#[derive(Debug, Error)]
#[error("unknown status value: {0}")]
pub struct UnknownStatus(pub String);

/// Lifecycle of a course offering.
///
/// `proposed → active | rejected`; `active → completed`.
/// `rejected` and `completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferingStatus {
    Proposed,
    Active,
    Rejected,
    Completed,
}

impl OfferingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferingStatus::Proposed => "proposed",
            OfferingStatus::Active => "active",
            OfferingStatus::Rejected => "rejected",
            OfferingStatus::Completed => "completed",
        }
    }

    /// Whether no further transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OfferingStatus::Rejected | OfferingStatus::Completed)
    }
}

impl FromStr for OfferingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proposed" => Ok(OfferingStatus::Proposed),
            "active" => Ok(OfferingStatus::Active),
            "rejected" => Ok(OfferingStatus::Rejected),
            "completed" => Ok(OfferingStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for OfferingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an enrollment request.
///
/// `pending_instructor → pending_faculty_advisor → enrolled`, with `rejected`
/// reachable from either pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    PendingInstructor,
    PendingFacultyAdvisor,
    Enrolled,
    Rejected,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::PendingInstructor => "pending_instructor",
            EnrollmentStatus::PendingFacultyAdvisor => "pending_faculty_advisor",
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for EnrollmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_instructor" => Ok(EnrollmentStatus::PendingInstructor),
            "pending_faculty_advisor" => Ok(EnrollmentStatus::PendingFacultyAdvisor),
            "enrolled" => Ok(EnrollmentStatus::Enrolled),
            "rejected" => Ok(EnrollmentStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approve/reject decision carried by offering and enrollment actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

/// How an enrollment came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentCategory {
    /// Auto-assigned when an offering with core criteria was approved.
    Core,
    /// Requested by the student through the approval workflow.
    Elective,
}

impl EnrollmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentCategory::Core => "core",
            EnrollmentCategory::Elective => "elective",
        }
    }
}

impl FromStr for EnrollmentCategory {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(EnrollmentCategory::Core),
            "elective" => Ok(EnrollmentCategory::Elective),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_status_round_trip() {
        for status in [
            OfferingStatus::Proposed,
            OfferingStatus::Active,
            OfferingStatus::Rejected,
            OfferingStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<OfferingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_enrollment_status_round_trip() {
        for status in [
            EnrollmentStatus::PendingInstructor,
            EnrollmentStatus::PendingFacultyAdvisor,
            EnrollmentStatus::Enrolled,
            EnrollmentStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<EnrollmentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("limbo".parse::<OfferingStatus>().is_err());
        assert!("limbo".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OfferingStatus::Proposed.is_terminal());
        assert!(!OfferingStatus::Active.is_terminal());
        assert!(OfferingStatus::Rejected.is_terminal());
        assert!(OfferingStatus::Completed.is_terminal());
    }
}
