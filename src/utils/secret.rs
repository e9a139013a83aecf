use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a plaintext secret using Argon2.
///
/// Uses the Argon2id variant with default parameters. The salt is generated
/// per call and embedded in the returned PHC string.
pub fn hash_secret(plaintext: &str) -> Result<String, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let secret_hash = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash secret: {}", e))?
        .to_string();

    Ok(secret_hash)
}

/// Verify a plaintext secret against a stored hash.
///
/// Comparison is constant-time inside the argon2 crate. A stored hash that
/// does not parse counts as a failed match, never a panic.
pub fn verify_secret(plaintext: &str, secret_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(secret_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "Stored secret hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_secret() {
        let hash = hash_secret("mySecurePassword123").expect("Failed to hash secret");

        assert!(!hash.is_empty());
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_secret_correct() {
        let hash = hash_secret("mySecurePassword123").expect("Failed to hash secret");

        assert!(verify_secret("mySecurePassword123", &hash));
    }

    #[test]
    fn test_verify_secret_incorrect() {
        let hash = hash_secret("mySecurePassword123").expect("Failed to hash secret");

        assert!(!verify_secret("wrongPassword", &hash));
    }

    #[test]
    fn test_verify_secret_malformed_hash() {
        assert!(!verify_secret("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_different_hashes_for_same_secret() {
        let hash1 = hash_secret("mySecurePassword123").expect("Failed to hash secret");
        let hash2 = hash_secret("mySecurePassword123").expect("Failed to hash secret");

        // Same secret should produce different hashes (due to random salt)
        assert_ne!(hash1, hash2);

        assert!(verify_secret("mySecurePassword123", &hash1));
        assert!(verify_secret("mySecurePassword123", &hash2));
    }
}
