//! Directory service: user and profile creation, admin listings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use registra_store::{FacultyRecord, RegistryStore, StudentRecord, users};
use registra_types::{
    FacultyProfile, Principal, Role, StudentProfile, User, new_id, now,
};

use crate::capability::require_admin;
use crate::error::{DomainError, Result};

/// Input for creating a student account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub entry_number: String,
    pub department: String,
    pub batch_year: i32,
}

/// Input for creating a faculty account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFaculty {
    pub name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
}

/// A freshly created account. The api token is returned exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUser {
    pub user: User,
    pub api_token: String,
}

/// Creates users with their role profile in one transaction and serves the
/// admin listings.
#[derive(Clone)]
pub struct Directory {
    store: Arc<RegistryStore>,
}

impl Directory {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    /// Create a student user and profile atomically.
    /// `Conflict` on duplicate email or entry number.
    pub fn add_student(&self, principal: &Principal, input: NewStudent) -> Result<CreatedUser> {
        require_admin(principal)?;
        validate_account(&input.name, &input.email)?;
        if input.entry_number.trim().is_empty() {
            return Err(DomainError::Validation(
                "entry number is required".to_string(),
            ));
        }

        let user = User {
            id: new_id(),
            name: input.name,
            email: input.email,
            role: Role::Student,
            created_at: now(),
        };
        let token = generate_token();

        self.store.with_transaction(|conn| {
            users::insert(conn, &user, &token)?;
            users::insert_student_profile(
                conn,
                &StudentProfile {
                    user_id: user.id.clone(),
                    entry_number: input.entry_number.clone(),
                    department: input.department.clone(),
                    batch_year: input.batch_year,
                    advisor_id: None,
                },
            )?;
            Ok::<_, DomainError>(())
        })?;

        info!(user_id = %user.id, entry_number = %input.entry_number, "Student created");
        Ok(CreatedUser {
            user,
            api_token: token,
        })
    }

    /// Create a faculty user and profile atomically. `Conflict` on duplicate
    /// email.
    pub fn add_faculty(&self, principal: &Principal, input: NewFaculty) -> Result<CreatedUser> {
        require_admin(principal)?;
        validate_account(&input.name, &input.email)?;

        let user = User {
            id: new_id(),
            name: input.name,
            email: input.email,
            role: Role::Faculty,
            created_at: now(),
        };
        let token = generate_token();

        self.store.with_transaction(|conn| {
            users::insert(conn, &user, &token)?;
            users::insert_faculty_profile(
                conn,
                &FacultyProfile {
                    user_id: user.id.clone(),
                    department: input.department.clone(),
                    designation: input.designation.clone(),
                },
            )?;
            Ok::<_, DomainError>(())
        })?;

        info!(user_id = %user.id, "Faculty created");
        Ok(CreatedUser {
            user,
            api_token: token,
        })
    }

    pub fn list_students(&self, principal: &Principal) -> Result<Vec<StudentRecord>> {
        require_admin(principal)?;
        self.store
            .with_conn(|conn| users::list_students(conn))
            .map_err(DomainError::from)
    }

    pub fn list_faculty(&self, principal: &Principal) -> Result<Vec<FacultyRecord>> {
        require_admin(principal)?;
        self.store
            .with_conn(|conn| users::list_faculty(conn))
            .map_err(DomainError::from)
    }

    /// Resolve an api token to its user. Used by the transport's auth layer.
    pub fn user_by_token(&self, token: &str) -> Result<Option<User>> {
        self.store
            .with_conn(|conn| users::by_token(conn, token))
            .map_err(DomainError::from)
    }
}

fn validate_account(name: &str, email: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("name is required".to_string()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::Validation(
            "a valid email is required".to_string(),
        ));
    }
    Ok(())
}

fn generate_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
