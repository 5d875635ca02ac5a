//! Well-known role name constants.
//!
//! These must match the CHECK constraint on `users.role` in the initial
//! schema migration.

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_SUPERVISOR: &str = "supervisor";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values, in the order they appear in the CHECK constraint.
pub const VALID_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_SUPERVISOR, ROLE_ADMIN];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_accepted() {
        assert!(validate_role(ROLE_STUDENT).is_ok());
        assert!(validate_role(ROLE_SUPERVISOR).is_ok());
        assert!(validate_role(ROLE_ADMIN).is_ok());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = validate_role("registrar");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid role"));
    }
}
