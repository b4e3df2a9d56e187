//! Login, password change and password reset payloads.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use validator::Validate;

use crate::types::{AdminId, InternId};
use crate::validation::rules;

/// Which account table a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Intern,
}

impl UserType {
    pub const ALLOWED: [&'static str; 2] = ["admin", "intern"];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Intern => "intern",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserType::Admin),
            "intern" => Ok(UserType::Intern),
            other => Err(format!("unknown user type: {}", other)),
        }
    }
}

/// Role string carried in admin tokens.
pub const ADMIN_ROLE: &str = "Admin";

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Admin username, or the application number for interns.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AuthUser {
    Admin(AdminUser),
    Intern(InternUser),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminId,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternUser {
    pub id: InternId,
    pub application_no: Option<String>,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "rules::validate_password_policy"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestPasswordResetPayload {
    #[serde(default)]
    pub user_type: Option<String>,
    /// Admins identify themselves by email.
    #[serde(default)]
    pub email: Option<String>,
    /// Interns identify themselves by application number.
    #[serde(default)]
    pub application_no: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordPayload {
    #[validate(custom(function = "rules::validate_password_policy"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResetTokenResponse {
    pub valid: bool,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_parses_lowercase_only() {
        assert_eq!("admin".parse::<UserType>(), Ok(UserType::Admin));
        assert_eq!("intern".parse::<UserType>(), Ok(UserType::Intern));
        assert!("Admin".parse::<UserType>().is_err());
    }

    #[test]
    fn change_password_enforces_policy() {
        let request = ChangePasswordRequest {
            current_password: "old-password".into(),
            new_password: "short".into(),
        };
        assert!(request.validate().is_err());

        let request = ChangePasswordRequest {
            current_password: "old-password".into(),
            new_password: "long-enough-password".into(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn intern_user_serializes_camel_case() {
        let user = AuthUser::Intern(InternUser {
            id: InternId::new(3),
            application_no: Some("NFSU-1".into()),
            full_name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            role: "Intern_approved&ongoing".into(),
            status: "Active".into(),
        });
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["applicationNo"], "NFSU-1");
        assert_eq!(json["fullName"], "Asha Rao");
        assert_eq!(json["id"], 3);
    }
}
