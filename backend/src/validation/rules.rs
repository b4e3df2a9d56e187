//! Validation rules shared by `#[derive(Validate)]` payloads.

use std::borrow::Cow;
use validator::ValidationError;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;

/// Requirements:
/// - 8 to 128 characters
/// - not only whitespace
pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ValidationError::new("password_length").with_message(Cow::Owned(format!(
            "Password must be between {} and {} characters",
            PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
        ))));
    }
    if password.trim().is_empty() {
        return Err(ValidationError::new("password_blank")
            .with_message(Cow::Borrowed("Password cannot be blank")));
    }
    Ok(())
}
