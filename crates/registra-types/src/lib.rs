//! Shared types for the Registra academic enrollment system.

pub mod entities;
pub mod principal;
pub mod status;

pub use entities::{
    Course, Enrollment, FacultyProfile, FeePayment, Offering, Semester, StudentProfile, User,
};
pub use principal::{Principal, Role};
pub use status::{Decision, EnrollmentCategory, EnrollmentStatus, OfferingStatus};

/// Entity identifier (UUID v4 as a string).
pub type Id = String;

/// Timestamp type used across all entities.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a new unique identifier.
pub fn new_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}

/// Current timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}
