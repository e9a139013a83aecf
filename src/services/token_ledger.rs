use std::sync::Arc;

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::{PasswordResetToken, Principal, RefreshToken};
use crate::store::AuthStore;
use crate::utils::generate_opaque_token;

use super::error::AuthError;
use super::jwt::{AccessClaims, JwtSigner};

/// Mints and validates the access, refresh, and reset token families and
/// owns their state transitions.
///
/// Refresh and reset tokens are opaque 256-bit values; possession is the
/// credential. Access tokens are stateless signed JWTs.
#[derive(Clone)]
pub struct TokenLedger {
    store: Arc<dyn AuthStore>,
    signer: JwtSigner,
    refresh_expiry_days: i64,
    reset_expiry_hours: i64,
}

impl TokenLedger {
    pub fn new(config: &AuthConfig, store: Arc<dyn AuthStore>) -> Self {
        Self {
            store,
            signer: JwtSigner::new(&config.jwt),
            refresh_expiry_days: config.jwt.refresh_token_expiry_days,
            reset_expiry_hours: config.tokens.reset_token_expiry_hours,
        }
    }

    // ==================== Access Tokens ====================

    /// Mint a short-lived access token for a principal.
    pub fn mint_access_token(&self, principal: &Principal) -> Result<String, AuthError> {
        self.signer
            .issue(principal.principal_id, &principal.email)
            .map_err(AuthError::Internal)
    }

    /// Verify an access token. Expired and tampered tokens fail identically.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.signer.verify(token)
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.signer.access_token_expiry_seconds()
    }

    // ==================== Refresh Tokens ====================

    /// Mint and persist a new refresh token, returning the opaque value.
    pub async fn mint_refresh_token(&self, principal_id: Uuid) -> Result<String, AuthError> {
        let value = generate_opaque_token();
        let token = RefreshToken::new(principal_id, value.clone(), self.refresh_expiry_days);
        self.store.insert_refresh_token(&token).await?;
        Ok(value)
    }

    /// Validate a refresh token and resolve its principal.
    ///
    /// Expiry is checked before the active flag: a token that is both
    /// expired and revoked reports `Expired`.
    pub async fn validate_refresh_token(&self, value: &str) -> Result<Principal, AuthError> {
        let token = self
            .store
            .find_refresh_token(value)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if token.is_expired() {
            return Err(AuthError::Expired);
        }
        if !token.active {
            return Err(AuthError::Revoked);
        }

        let principal = match self.store.find_principal(token.principal_id).await? {
            Some(p) => p,
            None => {
                // A live token pointing at a missing principal fails closed.
                tracing::warn!(
                    principal_id = %token.principal_id,
                    "Refresh token references missing principal"
                );
                return Err(AuthError::InvalidToken);
            }
        };

        if !principal.active {
            return Err(AuthError::AccountDeactivated);
        }

        Ok(principal)
    }

    /// Read-only peek at a refresh token row.
    pub async fn find_refresh_token(
        &self,
        value: &str,
    ) -> Result<Option<RefreshToken>, AuthError> {
        Ok(self.store.find_refresh_token(value).await?)
    }

    /// Deactivate a single refresh token. Idempotent.
    pub async fn revoke_refresh_token(&self, value: &str) -> Result<(), AuthError> {
        Ok(self.store.deactivate_refresh_token(value).await?)
    }

    /// Deactivate every active refresh token for a principal in one bulk
    /// conditional write. Returns the number revoked.
    pub async fn revoke_all_refresh_tokens(&self, principal_id: Uuid) -> Result<u64, AuthError> {
        let revoked = self.store.deactivate_refresh_tokens_for(principal_id).await?;
        if revoked > 0 {
            tracing::info!(principal_id = %principal_id, revoked, "Revoked refresh tokens");
        }
        Ok(revoked)
    }

    // ==================== Reset Tokens ====================

    /// Issue a fresh password reset token, invalidating any prior unused
    /// ones so at most one is outstanding per principal.
    pub async fn issue_reset_token(&self, principal_id: Uuid) -> Result<String, AuthError> {
        self.store.invalidate_reset_tokens_for(principal_id).await?;

        let value = generate_opaque_token();
        let token = PasswordResetToken::new(principal_id, value.clone(), self.reset_expiry_hours);
        self.store.insert_reset_token(&token).await?;
        Ok(value)
    }

    /// Consume a reset token, returning its principal id.
    ///
    /// The used flip is a single conditional write; of two concurrent
    /// consumers exactly one wins and the loser sees `AlreadyUsed`.
    pub async fn consume_reset_token(&self, value: &str) -> Result<Uuid, AuthError> {
        let token = self
            .store
            .find_reset_token(value)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if token.is_expired() {
            return Err(AuthError::Expired);
        }
        if token.used {
            return Err(AuthError::AlreadyUsed);
        }

        if !self.store.mark_reset_token_used(value).await? {
            return Err(AuthError::AlreadyUsed);
        }

        Ok(token.principal_id)
    }
}
