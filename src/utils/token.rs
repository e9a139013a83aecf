use rand::Rng;

/// Generate an opaque token value: 32 random bytes, hex-encoded.
///
/// 256 bits of entropy makes guessing infeasible; the value carries no
/// embedded structure and is stored as-is.
pub fn generate_opaque_token() -> String {
    let mut rng = rand::thread_rng();
    let token_bytes: [u8; 32] = rng.gen();
    hex::encode(token_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        // 32 bytes hex-encoded
        assert_eq!(generate_opaque_token().len(), 64);
    }

    #[test]
    fn test_token_is_hex() {
        let token = generate_opaque_token();
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_opaque_token();
        let b = generate_opaque_token();
        assert_ne!(a, b);
    }
}
