//! Role guards for admin routes.

use taskhub_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(())
}
