use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Principal, Role};
use crate::store::{AuthStore, StoreError};
use crate::utils::{hash_secret, verify_secret};

use super::error::AuthError;

/// Principal identity and secret management.
///
/// Owns all mutation of principal rows. Does not revoke tokens on secret
/// changes; the session flows own that cascade.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn AuthStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Create a new principal with a freshly hashed secret.
    pub async fn create_principal(
        &self,
        email: &str,
        name: &str,
        secret_plain: &str,
        role: Role,
        department: Option<String>,
        position: Option<String>,
    ) -> Result<Principal, AuthError> {
        let secret_hash = hash_secret(secret_plain)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("Secret hashing error: {}", e)))?;

        let principal = Principal::new(email, name, secret_hash, role, department, position);

        self.store
            .insert_principal(&principal)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AuthError::PrincipalAlreadyExists,
                other => AuthError::StorageUnavailable(other),
            })?;

        Ok(principal)
    }

    /// Find principal by email, case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, AuthError> {
        Ok(self.store.find_principal_by_email(email).await?)
    }

    pub async fn find(&self, principal_id: Uuid) -> Result<Option<Principal>, AuthError> {
        Ok(self.store.find_principal(principal_id).await?)
    }

    /// Verify a plaintext secret against the principal's stored hash.
    /// The plaintext is never logged.
    pub fn verify_secret(&self, principal: &Principal, plaintext: &str) -> bool {
        verify_secret(plaintext, &principal.secret_hash)
    }

    /// Re-hash and replace the principal's secret. Token revocation is the
    /// caller's responsibility.
    pub async fn update_secret(
        &self,
        principal_id: Uuid,
        new_plaintext: &str,
    ) -> Result<(), AuthError> {
        let secret_hash = hash_secret(new_plaintext)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("Secret hashing error: {}", e)))?;

        self.store
            .update_secret_hash(principal_id, &secret_hash)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::NotFound,
                other => AuthError::StorageUnavailable(other),
            })
    }

    pub async fn set_active(&self, principal_id: Uuid, active: bool) -> Result<(), AuthError> {
        self.store
            .set_principal_active(principal_id, active)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::NotFound,
                other => AuthError::StorageUnavailable(other),
            })
    }

    pub async fn touch_last_authenticated(&self, principal_id: Uuid) -> Result<(), AuthError> {
        self.store
            .touch_last_authenticated(principal_id, chrono::Utc::now())
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::NotFound,
                other => AuthError::StorageUnavailable(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn credentials() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_verify() {
        let creds = credentials();
        let p = creds
            .create_principal("a@x.com", "A", "correct horse", Role::Employee, None, None)
            .await
            .unwrap();

        assert!(creds.verify_secret(&p, "correct horse"));
        assert!(!creds.verify_secret(&p, "wrong horse"));
    }

    #[tokio::test]
    async fn test_duplicate_email_fails() {
        let creds = credentials();
        creds
            .create_principal("a@x.com", "A", "pw1", Role::Employee, None, None)
            .await
            .unwrap();

        let result = creds
            .create_principal("A@X.COM", "B", "pw2", Role::Admin, None, None)
            .await;
        assert!(matches!(result, Err(AuthError::PrincipalAlreadyExists)));
    }

    #[tokio::test]
    async fn test_update_secret_replaces_hash() {
        let creds = credentials();
        let p = creds
            .create_principal("a@x.com", "A", "old", Role::Employee, None, None)
            .await
            .unwrap();

        creds.update_secret(p.principal_id, "new").await.unwrap();

        let reloaded = creds.find(p.principal_id).await.unwrap().unwrap();
        assert!(creds.verify_secret(&reloaded, "new"));
        assert!(!creds.verify_secret(&reloaded, "old"));
    }

    #[tokio::test]
    async fn test_update_secret_unknown_principal() {
        let creds = credentials();
        let result = creds.update_secret(Uuid::new_v4(), "pw").await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }
}
