use std::sync::Arc;

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::{Invite, Principal, Role};
use crate::store::{AuthStore, StoreError};
use crate::utils::{generate_opaque_token, hash_secret};

use super::error::AuthError;

/// Onboarding invitations: a single-use token family whose consumption
/// creates a principal carrying the invite's embedded claims.
#[derive(Clone)]
pub struct InviteLedger {
    store: Arc<dyn AuthStore>,
    invite_expiry_days: i64,
}

impl InviteLedger {
    pub fn new(config: &AuthConfig, store: Arc<dyn AuthStore>) -> Self {
        Self {
            store,
            invite_expiry_days: config.tokens.invite_expiry_days,
        }
    }

    /// Create an invite for an email with no existing principal and no
    /// outstanding invite.
    pub async fn create_invite(
        &self,
        email: &str,
        role: Role,
        department: &str,
        position: &str,
        invited_by: Uuid,
    ) -> Result<Invite, AuthError> {
        if self.store.find_principal_by_email(email).await?.is_some() {
            return Err(AuthError::PrincipalAlreadyExists);
        }

        let invite = Invite::new(
            email,
            role,
            department,
            position,
            invited_by,
            generate_opaque_token(),
            self.invite_expiry_days,
        );

        // The duplicate check and the insert are one conditional write;
        // concurrent invites for the same email cannot both land.
        if !self.store.insert_invite(&invite).await? {
            return Err(AuthError::DuplicateActiveInvite);
        }

        tracing::info!(email = %invite.email, "Invite created");
        Ok(invite)
    }

    /// Consume an invite, creating the invited principal.
    ///
    /// The principal insert is the commit point: its unique email index
    /// arbitrates concurrent acceptances, and a crash before the mark-used
    /// write leaves any replay failing `PrincipalAlreadyExists` rather than
    /// re-creating the account.
    pub async fn accept_invite(
        &self,
        value: &str,
        name: &str,
        secret_plain: &str,
    ) -> Result<Principal, AuthError> {
        let invite = self
            .store
            .find_invite(value)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if invite.is_expired() {
            return Err(AuthError::Expired);
        }
        if invite.used {
            return Err(AuthError::AlreadyUsed);
        }

        if self
            .store
            .find_principal_by_email(&invite.email)
            .await?
            .is_some()
        {
            return Err(AuthError::PrincipalAlreadyExists);
        }

        let secret_hash = hash_secret(secret_plain)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("Secret hashing error: {}", e)))?;

        let principal = Principal::new(
            &invite.email,
            name,
            secret_hash,
            invite.role(),
            Some(invite.department.clone()),
            Some(invite.position.clone()),
        );

        self.store
            .insert_principal(&principal)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AuthError::PrincipalAlreadyExists,
                other => AuthError::StorageUnavailable(other),
            })?;

        // Post-commit cleanup: the principal exists either way, so a failed
        // flip is logged, not surfaced.
        match self.store.mark_invite_used(value).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(email = %invite.email, "Invite was already marked used");
            }
            Err(e) => {
                tracing::error!(error = %e, email = %invite.email, "Failed to mark invite used");
            }
        }

        tracing::info!(
            principal_id = %principal.principal_id,
            email = %principal.email,
            "Invite accepted"
        );

        Ok(principal)
    }
}
