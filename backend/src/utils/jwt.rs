use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::UserType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // admin or intern row id
    pub username: String,
    pub role: String,
    #[serde(rename = "userType")]
    pub user_type: UserType,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn new(
        subject_id: i64,
        username: String,
        role: String,
        user_type: UserType,
        expiration_hours: u64,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: subject_id.to_string(),
            username,
            role,
            user_type,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn subject_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

pub fn create_access_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let validation = Validation::default();
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "a_secure_token_that_is_long_enough_123";

    #[test]
    fn create_and_verify_round_trips_claims() {
        let claims = Claims::new(7, "NFSU-001".into(), "Intern_approved&ongoing".into(), UserType::Intern, 1);
        let token = create_access_token(&claims, SECRET).expect("create token");
        let verified = verify_access_token(&token, SECRET).expect("verify token");
        assert_eq!(verified, claims);
        assert_eq!(verified.subject_id(), Some(7));
    }

    #[test]
    fn claims_serialize_user_type_in_camel_case() {
        let claims = Claims::new(1, "admin".into(), "Admin".into(), UserType::Admin, 1);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userType"], "admin");
        assert_eq!(json["sub"], "1");
    }

    #[test]
    fn expired_tokens_are_distinguished() {
        let mut claims = Claims::new(1, "admin".into(), "Admin".into(), UserType::Admin, 1);
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;
        let token = create_access_token(&claims, SECRET).unwrap();
        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn wrong_secret_or_garbage_is_invalid() {
        let claims = Claims::new(1, "admin".into(), "Admin".into(), UserType::Admin, 1);
        let token = create_access_token(&claims, SECRET).unwrap();
        assert!(matches!(
            verify_access_token(&token, "another_secret_that_is_long_enough_456"),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            verify_access_token("not.a.jwt", SECRET),
            Err(TokenError::Invalid)
        ));
    }
}
