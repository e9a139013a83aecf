use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::{AuditAction, AuditEntry, ClientMeta, Invite, Principal, Role};
use crate::store::AuthStore;

use super::audit::AuditRecorder;
use super::credentials::CredentialStore;
use super::error::AuthError;
use super::invite_ledger::InviteLedger;
use super::jwt::AccessClaims;
use super::notifier::Notifier;
use super::token_ledger::TokenLedger;

/// Token pair returned to a freshly authenticated client.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenPair {
    fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Orchestrates the session flows by composing the credential store and the
/// token ledgers, and records every privileged transition on the audit
/// trail.
///
/// Audit writes and notifier calls are spawned; they never block or fail a
/// flow. When a flow fails after its identity was proven, the audit entry
/// still lands, carrying `"completed": false`.
#[derive(Clone)]
pub struct SessionManager {
    credentials: CredentialStore,
    tokens: TokenLedger,
    invites: InviteLedger,
    audit: AuditRecorder,
    notifier: Arc<dyn Notifier>,
}

impl SessionManager {
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn AuthStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            credentials: CredentialStore::new(store.clone()),
            tokens: TokenLedger::new(config, store.clone()),
            invites: InviteLedger::new(config, store.clone()),
            audit: AuditRecorder::new(store),
            notifier,
        }
    }

    // ==================== Component Access ====================

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn tokens(&self) -> &TokenLedger {
        &self.tokens
    }

    pub fn invites(&self) -> &InviteLedger {
        &self.invites
    }

    // ==================== Session Flows ====================

    /// Authenticate with email and secret, minting an access/refresh pair.
    ///
    /// Unknown email and wrong secret produce the same error. The active
    /// flag is checked only after the secret matches, so a deactivated
    /// account is disclosed to its owner alone.
    pub async fn login(
        &self,
        email: &str,
        secret: &str,
        meta: &ClientMeta,
    ) -> Result<TokenPair, AuthError> {
        let principal = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.credentials.verify_secret(&principal, secret) {
            return Err(AuthError::InvalidCredentials);
        }

        if !principal.active {
            return Err(AuthError::AccountDeactivated);
        }

        let outcome = async {
            let access_token = self.tokens.mint_access_token(&principal)?;
            let refresh_token = self.tokens.mint_refresh_token(principal.principal_id).await?;
            self.credentials
                .touch_last_authenticated(principal.principal_id)
                .await?;
            Ok(TokenPair::new(
                access_token,
                refresh_token,
                self.tokens.access_token_expiry_seconds(),
            ))
        }
        .await;

        self.record(
            Some(principal.principal_id),
            AuditAction::Login,
            "session",
            Some(principal.principal_id.to_string()),
            &outcome,
            meta,
        );

        if outcome.is_ok() {
            tracing::info!(principal_id = %principal.principal_id, "Login succeeded");
        }
        outcome
    }

    /// Mint a fresh access token against a valid refresh token. The refresh
    /// value is echoed back unchanged; it is not rotated on use.
    pub async fn refresh(&self, value: &str, meta: &ClientMeta) -> Result<TokenPair, AuthError> {
        let principal = self.tokens.validate_refresh_token(value).await?;

        let outcome = async {
            let access_token = self.tokens.mint_access_token(&principal)?;
            Ok(TokenPair::new(
                access_token,
                value.to_string(),
                self.tokens.access_token_expiry_seconds(),
            ))
        }
        .await;

        self.record(
            Some(principal.principal_id),
            AuditAction::TokenRefresh,
            "session",
            Some(principal.principal_id.to_string()),
            &outcome,
            meta,
        );

        outcome
    }

    /// Revoke the presented refresh token. Succeeds whether or not the
    /// token exists or is already revoked.
    pub async fn logout(&self, value: &str, meta: &ClientMeta) -> Result<(), AuthError> {
        // Peek first so the audit entry can name the principal.
        let Some(token) = self.tokens.find_refresh_token(value).await? else {
            return Ok(());
        };

        self.tokens.revoke_refresh_token(value).await?;

        self.record(
            Some(token.principal_id),
            AuditAction::Logout,
            "session",
            Some(token.principal_id.to_string()),
            &Ok(()),
            meta,
        );

        tracing::info!(principal_id = %token.principal_id, "Logged out");
        Ok(())
    }

    /// Request a password reset. Returns the identical success for unknown,
    /// inactive, and active accounts; only an active account gets a token
    /// and a notice. Failures after the lookup are logged and swallowed.
    pub async fn forgot_password(&self, email: &str, meta: &ClientMeta) -> Result<(), AuthError> {
        let principal = self.credentials.find_by_email(email).await?;

        let Some(principal) = principal else {
            return Ok(());
        };
        if !principal.active {
            return Ok(());
        }

        let reset_token = match self.tokens.issue_reset_token(principal.principal_id).await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    principal_id = %principal.principal_id,
                    "Failed to issue reset token"
                );
                return Ok(());
            }
        };

        // Deliver the notice off the request path.
        let notifier = self.notifier.clone();
        let to_email = principal.email.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier
                .send_password_reset_notice(&to_email, &reset_token)
                .await
            {
                tracing::warn!(error = %e, "Failed to deliver password reset notice");
            }
        });

        self.record(
            Some(principal.principal_id),
            AuditAction::PasswordResetRequest,
            "principal",
            Some(principal.principal_id.to_string()),
            &Ok(()),
            meta,
        );

        tracing::info!(principal_id = %principal.principal_id, "Password reset requested");
        Ok(())
    }

    /// Consume a reset token and set a new secret, revoking every refresh
    /// token the principal holds.
    ///
    /// The token is consumed before the secret is written: a failure in
    /// between burns the token instead of leaving it replayable.
    pub async fn reset_password(
        &self,
        value: &str,
        new_secret: &str,
        meta: &ClientMeta,
    ) -> Result<(), AuthError> {
        let principal_id = self.tokens.consume_reset_token(value).await?;

        let outcome = async {
            self.credentials.update_secret(principal_id, new_secret).await?;
            self.tokens.revoke_all_refresh_tokens(principal_id).await?;
            Ok(())
        }
        .await;

        self.record(
            Some(principal_id),
            AuditAction::PasswordReset,
            "principal",
            Some(principal_id.to_string()),
            &outcome,
            meta,
        );

        if outcome.is_ok() {
            tracing::info!(principal_id = %principal_id, "Password reset successful");
        }
        outcome
    }

    /// Change the secret of an authenticated principal, revoking every
    /// refresh token it holds.
    pub async fn change_password(
        &self,
        principal_id: Uuid,
        current_secret: &str,
        new_secret: &str,
        meta: &ClientMeta,
    ) -> Result<(), AuthError> {
        let principal = self
            .credentials
            .find(principal_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.credentials.verify_secret(&principal, current_secret) {
            return Err(AuthError::InvalidCredentials);
        }

        let outcome = async {
            self.credentials.update_secret(principal_id, new_secret).await?;
            self.tokens.revoke_all_refresh_tokens(principal_id).await?;
            Ok(())
        }
        .await;

        self.record(
            Some(principal_id),
            AuditAction::PasswordChange,
            "principal",
            Some(principal_id.to_string()),
            &outcome,
            meta,
        );

        if outcome.is_ok() {
            tracing::info!(principal_id = %principal_id, "Password changed");
        }
        outcome
    }

    // ==================== Invite Flows ====================

    /// Create an onboarding invite and dispatch the notice.
    pub async fn invite(
        &self,
        email: &str,
        role: Role,
        department: &str,
        position: &str,
        invited_by: Uuid,
        meta: &ClientMeta,
    ) -> Result<Invite, AuthError> {
        let invite = self
            .invites
            .create_invite(email, role, department, position, invited_by)
            .await?;

        // Deliver the notice off the request path; the inviter's display
        // name is resolved there too.
        let notifier = self.notifier.clone();
        let credentials = self.credentials.clone();
        let to_email = invite.email.clone();
        let token = invite.token.clone();
        tokio::spawn(async move {
            let inviter_name = match credentials.find(invited_by).await {
                Ok(Some(p)) => p.name,
                _ => String::new(),
            };
            if let Err(e) = notifier
                .send_invite_notice(&to_email, &token, &inviter_name)
                .await
            {
                tracing::warn!(error = %e, "Failed to deliver invite notice");
            }
        });

        self.record(
            Some(invited_by),
            AuditAction::InviteCreate,
            "invite",
            Some(invite.email.clone()),
            &Ok(()),
            meta,
        );

        Ok(invite)
    }

    /// Accept an invite, creating the principal and logging it in.
    pub async fn accept_invite(
        &self,
        value: &str,
        name: &str,
        secret: &str,
        meta: &ClientMeta,
    ) -> Result<(Principal, TokenPair), AuthError> {
        let principal = self.invites.accept_invite(value, name, secret).await?;

        let outcome = async {
            let access_token = self.tokens.mint_access_token(&principal)?;
            let refresh_token = self.tokens.mint_refresh_token(principal.principal_id).await?;
            Ok(TokenPair::new(
                access_token,
                refresh_token,
                self.tokens.access_token_expiry_seconds(),
            ))
        }
        .await;

        self.record(
            Some(principal.principal_id),
            AuditAction::InviteAccept,
            "invite",
            Some(principal.email.clone()),
            &outcome,
            meta,
        );

        outcome.map(|pair| (principal, pair))
    }

    // ==================== Principal Administration ====================

    /// Directly provision a principal (bootstrap and admin tooling).
    pub async fn create_principal(
        &self,
        email: &str,
        name: &str,
        secret: &str,
        role: Role,
        department: Option<String>,
        position: Option<String>,
        meta: &ClientMeta,
    ) -> Result<Principal, AuthError> {
        let principal = self
            .credentials
            .create_principal(email, name, secret, role, department, position)
            .await?;

        self.record(
            Some(principal.principal_id),
            AuditAction::UserCreate,
            "principal",
            Some(principal.principal_id.to_string()),
            &Ok(()),
            meta,
        );

        tracing::info!(principal_id = %principal.principal_id, "Principal created");
        Ok(principal)
    }

    /// Activate or deactivate a principal.
    ///
    /// Deactivation needs no token cascade: refresh validation gates on the
    /// active flag, so outstanding tokens stop working immediately.
    pub async fn set_principal_active(
        &self,
        principal_id: Uuid,
        active: bool,
        meta: &ClientMeta,
    ) -> Result<(), AuthError> {
        self.credentials.set_active(principal_id, active).await?;

        let action = if active {
            AuditAction::UserActivate
        } else {
            AuditAction::UserDeactivate
        };
        self.record(
            Some(principal_id),
            action,
            "principal",
            Some(principal_id.to_string()),
            &Ok(()),
            meta,
        );

        tracing::info!(principal_id = %principal_id, active, "Principal active flag set");
        Ok(())
    }

    /// Resolve the claims of a presented access token.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.tokens.verify_access_token(token)
    }

    fn record<T>(
        &self,
        principal_id: Option<Uuid>,
        action: AuditAction,
        resource_type: &str,
        resource_id: Option<String>,
        outcome: &Result<T, AuthError>,
        meta: &ClientMeta,
    ) {
        let details = outcome
            .is_err()
            .then(|| serde_json::json!({ "completed": false }));
        self.audit.record(AuditEntry::new(
            principal_id,
            action,
            resource_type,
            resource_id,
            details,
            meta,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifier::MockNotifier;
    use crate::store::MemoryStore;

    fn manager() -> SessionManager {
        SessionManager::new(
            &AuthConfig::for_tests(),
            Arc::new(MemoryStore::new()),
            Arc::new(MockNotifier::new()),
        )
    }

    #[tokio::test]
    async fn test_token_pair_shape() {
        let mgr = manager();
        let meta = ClientMeta::default();
        mgr.create_principal("a@x.com", "A", "pw", Role::Employee, None, None, &meta)
            .await
            .unwrap();

        let pair = mgr.login("a@x.com", "pw", &meta).await.unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
        assert!(!pair.access_token.is_empty());
        assert_eq!(pair.refresh_token.len(), 64);
    }

    #[tokio::test]
    async fn test_verify_access_token_roundtrip() {
        let mgr = manager();
        let meta = ClientMeta::default();
        let principal = mgr
            .create_principal("a@x.com", "A", "pw", Role::Admin, None, None, &meta)
            .await
            .unwrap();

        let pair = mgr.login("a@x.com", "pw", &meta).await.unwrap();
        let claims = mgr.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, principal.principal_id.to_string());
        assert_eq!(claims.email, "a@x.com");
    }
}
