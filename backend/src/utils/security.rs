use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hex-encoded random token built from `byte_len` bytes of OS entropy.
pub fn generate_token(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Only this digest is stored; the plaintext token lives in the email.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_and_unique() {
        let token = generate_token(32);
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token(32));
    }

    #[test]
    fn hash_is_stable_and_distinct() {
        let hash1 = hash_token("test-token-123");
        assert_eq!(hash1, hash_token("test-token-123"));
        assert_ne!(hash_token("different-token"), hash1);
        assert_eq!(hash1.len(), 64);
    }
}
