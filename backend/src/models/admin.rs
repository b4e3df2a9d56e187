use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::auth::{AdminUser, ADMIN_ROLE};
use crate::types::AdminId;

#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Admin> for AdminUser {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            full_name: admin.full_name.clone(),
            role: ADMIN_ROLE.to_string(),
        }
    }
}
