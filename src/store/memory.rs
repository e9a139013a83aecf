//! In-memory store backed by tokio `RwLock`ed maps.
//!
//! The default backend for tests and single-process deployments. All
//! conditional transitions happen under one write lock, giving the same
//! winner-takes-the-flip behavior as the PostgreSQL backend's conditional
//! UPDATEs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AuditEntry, Invite, PasswordResetToken, Principal, RefreshToken};

use super::{AuthStore, StoreError};

#[derive(Default)]
struct Inner {
    principals: HashMap<Uuid, Principal>,
    /// Lowercased email -> principal id.
    principals_by_email: HashMap<String, Uuid>,
    refresh_tokens: HashMap<String, RefreshToken>,
    reset_tokens: HashMap<String, PasswordResetToken>,
    invites: HashMap<String, Invite>,
    audit_entries: Vec<AuditEntry>,
}

/// In-memory `AuthStore` implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the audit trail, oldest first. Test support.
    pub async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.inner.read().await.audit_entries.clone()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn insert_principal(&self, principal: &Principal) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let email_key = principal.email.to_lowercase();
        if inner.principals_by_email.contains_key(&email_key) {
            return Err(StoreError::Duplicate(format!(
                "principal email {} already registered",
                principal.email
            )));
        }
        inner
            .principals_by_email
            .insert(email_key, principal.principal_id);
        inner
            .principals
            .insert(principal.principal_id, principal.clone());
        Ok(())
    }

    async fn find_principal(&self, principal_id: Uuid) -> Result<Option<Principal>, StoreError> {
        Ok(self.inner.read().await.principals.get(&principal_id).cloned())
    }

    async fn find_principal_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Principal>, StoreError> {
        let inner = self.inner.read().await;
        let id = inner.principals_by_email.get(&email.to_lowercase());
        Ok(id.and_then(|id| inner.principals.get(id)).cloned())
    }

    async fn update_secret_hash(
        &self,
        principal_id: Uuid,
        secret_hash: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let principal = inner
            .principals
            .get_mut(&principal_id)
            .ok_or(StoreError::NotFound)?;
        principal.secret_hash = secret_hash.to_string();
        Ok(())
    }

    async fn set_principal_active(
        &self,
        principal_id: Uuid,
        active: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let principal = inner
            .principals
            .get_mut(&principal_id)
            .ok_or(StoreError::NotFound)?;
        principal.active = active;
        Ok(())
    }

    async fn touch_last_authenticated(
        &self,
        principal_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let principal = inner
            .principals
            .get_mut(&principal_id)
            .ok_or(StoreError::NotFound)?;
        principal.last_authenticated_utc = Some(at);
        Ok(())
    }

    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.refresh_tokens.contains_key(&token.token) {
            return Err(StoreError::Duplicate("refresh token collision".to_string()));
        }
        inner.refresh_tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.inner.read().await.refresh_tokens.get(token).cloned())
    }

    async fn deactivate_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(row) = inner.refresh_tokens.get_mut(token) {
            row.active = false;
        }
        Ok(())
    }

    async fn deactivate_refresh_tokens_for(
        &self,
        principal_id: Uuid,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let mut count = 0;
        for row in inner.refresh_tokens.values_mut() {
            if row.principal_id == principal_id && row.active {
                row.active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert_reset_token(&self, token: &PasswordResetToken) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.reset_tokens.contains_key(&token.token) {
            return Err(StoreError::Duplicate("reset token collision".to_string()));
        }
        inner.reset_tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, StoreError> {
        Ok(self.inner.read().await.reset_tokens.get(token).cloned())
    }

    async fn mark_reset_token_used(&self, token: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.reset_tokens.get_mut(token) {
            Some(row) if !row.used => {
                row.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invalidate_reset_tokens_for(&self, principal_id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let mut count = 0;
        for row in inner.reset_tokens.values_mut() {
            if row.principal_id == principal_id && !row.used {
                row.used = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert_invite(&self, invite: &Invite) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let email_key = invite.email.to_lowercase();
        let active_exists = inner
            .invites
            .values()
            .any(|i| i.email.to_lowercase() == email_key && !i.used && !i.is_expired());
        if active_exists {
            return Ok(false);
        }
        inner.invites.insert(invite.token.clone(), invite.clone());
        Ok(true)
    }

    async fn find_invite(&self, token: &str) -> Result<Option<Invite>, StoreError> {
        Ok(self.inner.read().await.invites.get(token).cloned())
    }

    async fn mark_invite_used(&self, token: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.invites.get_mut(token) {
            Some(row) if !row.used => {
                row.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn append_audit_entry(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.inner.write().await.audit_entries.push(entry.clone());
        Ok(())
    }
}
