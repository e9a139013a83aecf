//! Refresh token model - long-lived opaque session credentials.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Refresh token entity.
///
/// The opaque value is the primary key; its entropy is the security control.
/// Rows are deactivated, never deleted, before expiry.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub principal_id: Uuid,
    pub expiry_utc: DateTime<Utc>,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}

impl RefreshToken {
    /// Create a new active refresh token expiring `expiry_days` from now.
    pub fn new(principal_id: Uuid, token: String, expiry_days: i64) -> Self {
        Self {
            token,
            principal_id,
            expiry_utc: Utc::now() + Duration::days(expiry_days),
            active: true,
            created_utc: Utc::now(),
        }
    }

    /// Check if the token is expired. Expiry is terminal and read-only; no
    /// row mutation is required for an expired token to stop working.
    pub fn is_expired(&self) -> bool {
        self.expiry_utc <= Utc::now()
    }

    /// Check if the token is usable (active and not expired).
    pub fn is_usable(&self) -> bool {
        self.active && !self.is_expired()
    }
}
