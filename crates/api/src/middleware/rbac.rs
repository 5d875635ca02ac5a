//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement. [`DenyAdmin`] is the inverse: it gates
//! endpoints that are explicitly closed to admins (a student's own
//! milestone workflow), matching the platform's "admins administer, they
//! don't participate" rule.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use projecthub_core::error::CoreError;
use projecthub_core::roles::{ROLE_ADMIN, ROLE_STUDENT, ROLE_SUPERVISOR};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `supervisor` or `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireSupervisor(pub AuthUser);

impl FromRequestParts<AppState> for RequireSupervisor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_SUPERVISOR {
            return Err(AppError::Core(CoreError::Forbidden(
                "Supervisor or Admin role required".into(),
            )));
        }
        Ok(RequireSupervisor(user))
    }
}

/// Requires the `student` role specifically (proposal submission,
/// bookmark management).
pub struct RequireStudent(pub AuthUser);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_STUDENT {
            return Err(AppError::Core(CoreError::Forbidden(
                "Student role required".into(),
            )));
        }
        Ok(RequireStudent(user))
    }
}

/// Requires any authenticated non-admin user. The explicit role gate for
/// participation endpoints where admins are excluded.
pub struct DenyAdmin(pub AuthUser);

impl FromRequestParts<AppState> for DenyAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role == ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "This endpoint is not available to admin accounts".into(),
            )));
        }
        Ok(DenyAdmin(user))
    }
}
