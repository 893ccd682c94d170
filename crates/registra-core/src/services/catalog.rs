//! Course catalog service.

use std::sync::Arc;

use tracing::info;

use registra_store::{RegistryStore, catalog};
use registra_types::{Course, Principal, Role};

use crate::error::{DomainError, Result};

/// Catalog entries are created by admins or faculty and never mutated.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<RegistryStore>,
}

impl Catalog {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Create a catalog entry. `Conflict` if the course code exists.
    pub fn create_course(&self, principal: &Principal, course: Course) -> Result<Course> {
        match principal.role() {
            Role::Admin | Role::Faculty => {}
            other => {
                return Err(DomainError::Unauthorized(format!(
                    "requires admin or faculty role, caller is {other}"
                )));
            }
        }
        if course.code.trim().is_empty() {
            return Err(DomainError::Validation("course code is required".to_string()));
        }
        if course.title.trim().is_empty() {
            return Err(DomainError::Validation("course title is required".to_string()));
        }

        self.store
            .with_conn(|conn| catalog::insert(conn, &course))
            .map_err(DomainError::from)?;

        info!(course_code = %course.code, "Catalog entry created");
        Ok(course)
    }

    /// List the catalog. Available to any authenticated caller.
    pub fn list(&self, _principal: &Principal) -> Result<Vec<Course>> {
        self.store
            .with_conn(|conn| catalog::list(conn))
            .map_err(DomainError::from)
    }
}
