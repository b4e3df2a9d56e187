use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::Rng;

/// Length of the credential generated when an intern is onboarded.
pub const GENERATED_PASSWORD_LEN: usize = 12;

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%&*";

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;

    let argon2 = Argon2::default();
    let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

    match result {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification error: {}", e)),
    }
}

/// Argon2 is CPU bound; keep it off the async workers.
pub async fn hash_password_blocking(password: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

pub async fn verify_password_blocking(password: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?
}

/// Random credential from an alphabet without look-alike characters.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LEN)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let pw = "S3cr3t!pass";
        let hash = hash_password(pw).expect("hash should succeed");
        assert!(verify_password(pw, &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn generated_passwords_use_the_charset() {
        let first = generate_password();
        let second = generate_password();
        assert_eq!(first.chars().count(), GENERATED_PASSWORD_LEN);
        assert!(first.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn blocking_helpers_match_sync_versions() {
        let hash = hash_password_blocking("blocking-pass".into()).await.unwrap();
        assert!(verify_password_blocking("blocking-pass".into(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_blocking("other".into(), hash).await.unwrap());
    }
}
