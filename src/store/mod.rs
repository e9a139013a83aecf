//! Storage abstraction for credentials, tokens, invites, and the audit
//! trail.
//!
//! Every monotonic state transition (token consumption, revocation, invite
//! acceptance) is expressed as a single conditional write so that concurrent
//! callers race on the store, not in application code. A conditional write
//! returns whether this caller won the flip.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AuditEntry, Invite, PasswordResetToken, Principal, RefreshToken};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage-layer error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence seam for the credential subsystem.
///
/// Lookups return `Ok(None)` for absent records; `StoreError::NotFound` is
/// reserved for updates whose target row does not exist.
#[async_trait]
pub trait AuthStore: Send + Sync {
    // ==================== Principal Operations ====================

    /// Insert a new principal. Fails with `Duplicate` when the email is
    /// already registered (case-insensitive).
    async fn insert_principal(&self, principal: &Principal) -> Result<(), StoreError>;

    async fn find_principal(&self, principal_id: Uuid) -> Result<Option<Principal>, StoreError>;

    /// Find principal by email, case-insensitive.
    async fn find_principal_by_email(&self, email: &str)
        -> Result<Option<Principal>, StoreError>;

    async fn update_secret_hash(
        &self,
        principal_id: Uuid,
        secret_hash: &str,
    ) -> Result<(), StoreError>;

    async fn set_principal_active(
        &self,
        principal_id: Uuid,
        active: bool,
    ) -> Result<(), StoreError>;

    async fn touch_last_authenticated(
        &self,
        principal_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // ==================== Refresh Token Operations ====================

    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;

    /// Deactivate a single refresh token. Idempotent.
    async fn deactivate_refresh_token(&self, token: &str) -> Result<(), StoreError>;

    /// Deactivate every active refresh token for a principal in one write.
    /// Returns the number of tokens that were still active.
    async fn deactivate_refresh_tokens_for(&self, principal_id: Uuid)
        -> Result<u64, StoreError>;

    // ==================== Reset Token Operations ====================

    async fn insert_reset_token(&self, token: &PasswordResetToken) -> Result<(), StoreError>;

    async fn find_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, StoreError>;

    /// Flip an unused reset token to used. Returns false when no unused row
    /// was updated, so callers can detect a lost consumption race.
    async fn mark_reset_token_used(&self, token: &str) -> Result<bool, StoreError>;

    /// Mark every unused reset token for a principal as used in one write.
    /// Returns the number of tokens invalidated.
    async fn invalidate_reset_tokens_for(&self, principal_id: Uuid) -> Result<u64, StoreError>;

    // ==================== Invite Operations ====================

    /// Insert an invite unless an unused, unexpired invite already exists
    /// for the same email. Returns false when such an invite exists.
    async fn insert_invite(&self, invite: &Invite) -> Result<bool, StoreError>;

    async fn find_invite(&self, token: &str) -> Result<Option<Invite>, StoreError>;

    /// Flip an unused invite to used. Returns false when no unused row was
    /// updated.
    async fn mark_invite_used(&self, token: &str) -> Result<bool, StoreError>;

    // ==================== Audit Operations ====================

    /// Append an entry to the audit trail. The trail is append-only.
    async fn append_audit_entry(&self, entry: &AuditEntry) -> Result<(), StoreError>;
}
