pub mod admin;
pub mod applications;
pub mod auth;
pub mod enrollment;
pub mod extract;
pub mod files;
pub mod intern;
pub mod password_reset;

pub use extract::AppJson;
