//! Advisor assignment service.

use std::sync::Arc;

use tracing::info;

use registra_store::{RegistryStore, users};
use registra_types::{Principal, Role};

use crate::capability::require_admin;
use crate::error::{DomainError, Result};

/// Binds students to faculty advisors; the binding is consumed by the
/// enrollment workflow's advisor-approval stage.
#[derive(Clone)]
pub struct AdvisorAssignment {
    store: Arc<RegistryStore>,
}

impl AdvisorAssignment {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Bind the student with `entry_number` to the faculty member with
    /// `faculty_email`. Idempotent: reassignment overwrites.
    pub fn assign(
        &self,
        principal: &Principal,
        entry_number: &str,
        faculty_email: &str,
    ) -> Result<()> {
        require_admin(principal)?;

        self.store.with_transaction(|conn| {
            let advisor_id = users::id_by_email_and_role(conn, faculty_email, Role::Faculty)?
                .ok_or_else(|| {
                    DomainError::NotFound(format!("faculty {faculty_email} not found"))
                })?;

            if !users::set_advisor(conn, entry_number, &advisor_id)? {
                return Err(DomainError::NotFound(format!(
                    "student {entry_number} not found"
                )));
            }

            info!(entry_number, advisor_id = %advisor_id, "Advisor assigned");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testfx::Fixture;

    #[test]
    fn test_assignment_is_idempotent_and_overwrites() {
        let fx = Fixture::new();
        fx.faculty("nair@example.edu");
        fx.faculty("rao@example.edu");
        fx.student("asha@example.edu", "2023CSB1001", "CSE", 2023);

        let advisors = fx.services.advisors();
        advisors
            .assign(&fx.admin, "2023CSB1001", "nair@example.edu")
            .unwrap();
        // Same arguments again: same binding, no error
        advisors
            .assign(&fx.admin, "2023CSB1001", "nair@example.edu")
            .unwrap();
        // Reassignment overwrites
        advisors
            .assign(&fx.admin, "2023CSB1001", "rao@example.edu")
            .unwrap();
    }

    #[test]
    fn test_missing_faculty_or_student() {
        let fx = Fixture::new();
        fx.faculty("nair@example.edu");
        fx.student("asha@example.edu", "2023CSB1001", "CSE", 2023);

        let advisors = fx.services.advisors();
        let err = advisors
            .assign(&fx.admin, "2023CSB1001", "ghost@example.edu")
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = advisors
            .assign(&fx.admin, "1999XXX0000", "nair@example.edu")
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        // A student's email does not resolve as an advisor
        let err = advisors
            .assign(&fx.admin, "2023CSB1001", "asha@example.edu")
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn test_requires_admin() {
        let fx = Fixture::new();
        let faculty = fx.faculty("nair@example.edu");
        fx.student("asha@example.edu", "2023CSB1001", "CSE", 2023);

        let err = fx
            .services
            .advisors()
            .assign(&faculty, "2023CSB1001", "nair@example.edu")
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }
}
