//! Audit trail model.
//!
//! Audit entries are append-only records of security-relevant state
//! transitions. Entries carry credential references (token identifiers are
//! never written), the acting principal when one is known, and request
//! metadata for forensics.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed set of auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Logout,
    TokenRefresh,
    PasswordChange,
    PasswordResetRequest,
    PasswordReset,
    UserCreate,
    UserUpdate,
    UserDeactivate,
    UserActivate,
    RoleChange,
    InviteCreate,
    InviteAccept,
    ProjectCreate,
    ProjectUpdate,
    ProjectDelete,
    TaskCreate,
    TaskUpdate,
    TaskDelete,
    CommentCreate,
    FileUpload,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::TokenRefresh => "token_refresh",
            AuditAction::PasswordChange => "password_change",
            AuditAction::PasswordResetRequest => "password_reset_request",
            AuditAction::PasswordReset => "password_reset",
            AuditAction::UserCreate => "user_create",
            AuditAction::UserUpdate => "user_update",
            AuditAction::UserDeactivate => "user_deactivate",
            AuditAction::UserActivate => "user_activate",
            AuditAction::RoleChange => "role_change",
            AuditAction::InviteCreate => "invite_create",
            AuditAction::InviteAccept => "invite_accept",
            AuditAction::ProjectCreate => "project_create",
            AuditAction::ProjectUpdate => "project_update",
            AuditAction::ProjectDelete => "project_delete",
            AuditAction::TaskCreate => "task_create",
            AuditAction::TaskUpdate => "task_update",
            AuditAction::TaskDelete => "task_delete",
            AuditAction::CommentCreate => "comment_create",
            AuditAction::FileUpload => "file_upload",
        }
    }
}

/// Request metadata attached to audit entries.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A single audit trail entry.
///
/// `principal_id` is `None` for anonymous events (such as failed reset
/// requests for unknown addresses never reaching the trail, or acceptance
/// flows where no principal exists yet).
#[derive(Debug, Clone, FromRow)]
pub struct AuditEntry {
    pub event_id: Uuid,
    pub principal_id: Option<Uuid>,
    pub action_code: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        principal_id: Option<Uuid>,
        action: AuditAction,
        resource_type: &str,
        resource_id: Option<String>,
        details: Option<serde_json::Value>,
        meta: &ClientMeta,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            principal_id,
            action_code: action.as_str().to_string(),
            resource_type: resource_type.to_string(),
            resource_id,
            details,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
            created_utc: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_codes_are_stable() {
        assert_eq!(AuditAction::Login.as_str(), "login");
        assert_eq!(AuditAction::PasswordResetRequest.as_str(), "password_reset_request");
        assert_eq!(AuditAction::InviteAccept.as_str(), "invite_accept");
    }

    #[test]
    fn test_new_entry_carries_meta() {
        let pid = Uuid::new_v4();
        let meta = ClientMeta {
            ip_address: Some("10.0.0.1".to_string()),
            user_agent: Some("integration-test".to_string()),
        };
        let e = AuditEntry::new(
            Some(pid),
            AuditAction::Logout,
            "session",
            Some(pid.to_string()),
            None,
            &meta,
        );
        assert_eq!(e.principal_id, Some(pid));
        assert_eq!(e.action_code, "logout");
        assert_eq!(e.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(e.user_agent.as_deref(), Some("integration-test"));
    }
}
