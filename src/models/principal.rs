//! Principal model - authenticated identities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Principal role codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

/// Principal entity.
///
/// Never deleted while referenced tokens exist; deactivation is the supported
/// way to take an account out of service.
#[derive(Debug, Clone, FromRow)]
pub struct Principal {
    pub principal_id: Uuid,
    pub email: String,
    pub name: String,
    pub secret_hash: String,
    pub role_code: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub active: bool,
    pub last_authenticated_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
}

impl Principal {
    /// Create a new active principal. The email is stored case-normalized.
    pub fn new(
        email: &str,
        name: &str,
        secret_hash: String,
        role: Role,
        department: Option<String>,
        position: Option<String>,
    ) -> Self {
        Self {
            principal_id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            name: name.to_string(),
            secret_hash,
            role_code: role.as_str().to_string(),
            department,
            position,
            active: true,
            last_authenticated_utc: None,
            created_utc: Utc::now(),
        }
    }

    /// Role of this principal. Unknown codes map to the least-privileged role.
    pub fn role(&self) -> Role {
        Role::from_code(&self.role_code).unwrap_or(Role::Employee)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_email() {
        let p = Principal::new(
            "  Jane.Doe@Example.COM ",
            "Jane Doe",
            "$argon2id$fake".to_string(),
            Role::Employee,
            None,
            None,
        );
        assert_eq!(p.email, "jane.doe@example.com");
        assert!(p.active);
        assert!(p.last_authenticated_utc.is_none());
    }

    #[test]
    fn test_role_codes() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::from_code("employee"), Some(Role::Employee));
        assert_eq!(Role::from_code("superuser"), None);
    }

    #[test]
    fn test_unknown_role_code_maps_to_employee() {
        let mut p = Principal::new(
            "a@x.com",
            "A",
            "hash".to_string(),
            Role::Admin,
            None,
            None,
        );
        assert!(p.is_admin());
        p.role_code = "mystery".to_string();
        assert_eq!(p.role(), Role::Employee);
    }
}
