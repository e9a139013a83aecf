use thiserror::Error;

use crate::store::StoreError;

/// Credential subsystem error.
///
/// Authentication and token validation failures carry no detail about which
/// check failed; callers surface the variant message only.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account deactivated")]
    AccountDeactivated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    Expired,

    #[error("Token revoked")]
    Revoked,

    #[error("Token already used")]
    AlreadyUsed,

    #[error("An active invite already exists for this email")]
    DuplicateActiveInvite,

    #[error("A principal with this email already exists")]
    PrincipalAlreadyExists,

    #[error("Record not found")]
    NotFound,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failures_carry_no_detail() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(AuthError::Expired.to_string(), "Token expired");
    }

    #[test]
    fn test_store_error_converts_to_storage_unavailable() {
        let err: AuthError = StoreError::Unavailable("pool closed".to_string()).into();
        assert!(matches!(err, AuthError::StorageUnavailable(_)));
    }
}
