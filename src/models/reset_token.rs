//! Password reset token model - short-lived single-use credentials.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Password reset token entity.
///
/// At most one unused, unexpired row exists per principal; issuing a new one
/// marks all prior unused rows used.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordResetToken {
    pub token: String,
    pub principal_id: Uuid,
    pub expiry_utc: DateTime<Utc>,
    pub used: bool,
    pub created_utc: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Create a new unused reset token expiring `expiry_hours` from now.
    pub fn new(principal_id: Uuid, token: String, expiry_hours: i64) -> Self {
        Self {
            token,
            principal_id,
            expiry_utc: Utc::now() + Duration::hours(expiry_hours),
            used: false,
            created_utc: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expiry_utc <= Utc::now()
    }
}
