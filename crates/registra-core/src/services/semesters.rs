//! Semester reference data service.

use std::sync::Arc;

use tracing::info;

use registra_store::{RegistryStore, semesters};
use registra_types::{Principal, Semester};

use crate::capability::require_admin;
use crate::error::{DomainError, Result};

/// Semesters are created by admins and never mutated afterwards.
#[derive(Clone)]
pub struct Semesters {
    store: Arc<RegistryStore>,
}

impl Semesters {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Create a semester. `Conflict` if the code exists.
    pub fn create(&self, principal: &Principal, semester: Semester) -> Result<Semester> {
        require_admin(principal)?;
        if semester.code.trim().is_empty() {
            return Err(DomainError::Validation(
                "semester code is required".to_string(),
            ));
        }

        self.store
            .with_conn(|conn| semesters::insert(conn, &semester))
            .map_err(DomainError::from)?;

        info!(semester_code = %semester.code, "Semester created");
        Ok(semester)
    }

    pub fn list(&self, principal: &Principal) -> Result<Vec<Semester>> {
        require_admin(principal)?;
        self.store
            .with_conn(|conn| semesters::list(conn))
            .map_err(DomainError::from)
    }
}
