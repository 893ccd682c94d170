//! Persisted entities. The relational store is the source of truth; these
//! structs are row images, not live objects.

use serde::{Deserialize, Serialize};

use crate::principal::Role;
use crate::status::{EnrollmentCategory, EnrollmentStatus, OfferingStatus};
use crate::{Id, Timestamp};

/// An account holder. Owns at most one student or faculty profile
/// depending on role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
}

/// Student profile attached to a `User` with `Role::Student`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub user_id: Id,
    pub entry_number: String,
    pub department: String,
    pub batch_year: i32,
    /// Assigned faculty advisor, set only by advisor assignment.
    pub advisor_id: Option<Id>,
}

/// Faculty profile attached to a `User` with `Role::Faculty`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyProfile {
    pub user_id: Id,
    pub department: String,
    pub designation: String,
}

/// A semester definition. Reference data, never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Semester {
    pub code: String,
    pub year: i32,
    pub term: String,
    pub start_date: String,
    pub end_date: String,
}

/// A catalog entry. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub title: String,
    /// Lecture-tutorial-practical structure, e.g. "3-1-2".
    pub ltp: String,
    pub credits: f64,
}

/// A scheduled instance of a catalog course for one semester, taught by one
/// instructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offering {
    pub id: Id,
    pub course_code: String,
    pub semester_code: String,
    pub instructor_id: Id,
    pub slot: String,
    pub seat_limit: i64,
    pub status: OfferingStatus,
    pub allowed_batches: Vec<i32>,
    pub allowed_departments: Vec<String>,
    /// Batch years whose matching students are auto-enrolled on approval.
    pub core_batches: Vec<i32>,
    /// Departments whose matching students are auto-enrolled on approval.
    pub core_departments: Vec<String>,
    pub created_at: Timestamp,
}

impl Offering {
    /// Whether approval should fan out core enrollments: both criteria sets
    /// must be non-empty.
    pub fn has_core_criteria(&self) -> bool {
        !self.core_batches.is_empty() && !self.core_departments.is_empty()
    }
}

/// A student's membership (or requested membership) in an offering.
/// Unique per `(student_id, offering_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Id,
    pub student_id: Id,
    pub offering_id: Id,
    pub status: EnrollmentStatus,
    pub category: EnrollmentCategory,
    pub grade: Option<String>,
    pub created_at: Timestamp,
}

/// A fee payment fact. Presence of a row for `(student_id, semester_code)`
/// is the sole fee-paid signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeePayment {
    pub student_id: Id,
    pub semester_code: String,
    pub amount: i64,
    pub transaction_ref: String,
    pub paid_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_id, now};

    fn offering_with(core_batches: Vec<i32>, core_departments: Vec<String>) -> Offering {
        Offering {
            id: new_id(),
            course_code: "CS101".to_string(),
            semester_code: "2026-W".to_string(),
            instructor_id: new_id(),
            slot: "A".to_string(),
            seat_limit: 60,
            status: OfferingStatus::Proposed,
            allowed_batches: vec![],
            allowed_departments: vec![],
            core_batches,
            core_departments,
            created_at: now(),
        }
    }

    #[test]
    fn test_core_criteria_requires_both_sets() {
        assert!(offering_with(vec![2023], vec!["CSE".to_string()]).has_core_criteria());
        assert!(!offering_with(vec![2023], vec![]).has_core_criteria());
        assert!(!offering_with(vec![], vec!["CSE".to_string()]).has_core_criteria());
        assert!(!offering_with(vec![], vec![]).has_core_criteria());
    }
}
