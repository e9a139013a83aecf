//! Invite model - onboarding invitations with embedded role claims.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Role;

/// Invite entity.
///
/// A single-use token family: consumption creates a principal carrying the
/// invite's embedded role, department, and position.
#[derive(Debug, Clone, FromRow)]
pub struct Invite {
    pub token: String,
    pub email: String,
    pub role_code: String,
    pub department: String,
    pub position: String,
    pub invited_by: Uuid,
    pub expiry_utc: DateTime<Utc>,
    pub used: bool,
    pub created_utc: DateTime<Utc>,
}

impl Invite {
    /// Create a new unused invite expiring `expiry_days` from now.
    pub fn new(
        email: &str,
        role: Role,
        department: &str,
        position: &str,
        invited_by: Uuid,
        token: String,
        expiry_days: i64,
    ) -> Self {
        Self {
            token,
            email: email.trim().to_lowercase(),
            role_code: role.as_str().to_string(),
            department: department.to_string(),
            position: position.to_string(),
            invited_by,
            expiry_utc: Utc::now() + Duration::days(expiry_days),
            used: false,
            created_utc: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expiry_utc <= Utc::now()
    }

    /// Role embedded in the invite. Unknown codes map to the
    /// least-privileged role.
    pub fn role(&self) -> Role {
        Role::from_code(&self.role_code).unwrap_or(Role::Employee)
    }
}
