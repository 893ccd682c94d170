//! Capability checks.
//!
//! Every mutating operation starts with one of these; ownership predicates
//! are checked again on the loaded row, never assumed from routing.

use registra_types::{Principal, Role};

use crate::error::{DomainError, Result};

/// Require an exact role. Admin rights do not substitute for faculty or
/// student roles: an admin cannot float a course or register for one.
pub fn require_role(principal: &Principal, role: Role) -> Result<()> {
    if principal.role() == role {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(format!(
            "requires {role} role, caller is {}",
            principal.role()
        )))
    }
}

/// Require admin rights (a user with the admin role, or the bootstrap
/// principal).
pub fn require_admin(principal: &Principal) -> Result<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(format!(
            "requires admin role, caller is {}",
            principal.role()
        )))
    }
}

/// Require the given role and a backing user row, returning the user id.
/// The bootstrap principal has no user row and cannot act as one.
pub fn acting_user(principal: &Principal, role: Role) -> Result<&str> {
    require_role(principal, role)?;
    principal.user_id().ok_or_else(|| {
        DomainError::Unauthorized(format!("operation requires a {role} user account"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Principal {
        Principal::User {
            id: "u-1".to_string(),
            role: Role::Student,
        }
    }

    #[test]
    fn test_require_role_exact_match() {
        assert!(require_role(&student(), Role::Student).is_ok());
        assert!(matches!(
            require_role(&student(), Role::Faculty),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_admin_does_not_substitute() {
        assert!(matches!(
            require_role(&Principal::Bootstrap, Role::Student),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(require_admin(&Principal::Bootstrap).is_ok());
        assert!(matches!(
            require_admin(&student()),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_acting_user_needs_user_row() {
        assert_eq!(acting_user(&student(), Role::Student).unwrap(), "u-1");
        let admin = Principal::User {
            id: "u-2".to_string(),
            role: Role::Admin,
        };
        assert_eq!(acting_user(&admin, Role::Admin).unwrap(), "u-2");
        assert!(matches!(
            acting_user(&Principal::Bootstrap, Role::Admin),
            Err(DomainError::Unauthorized(_))
        ));
    }
}
