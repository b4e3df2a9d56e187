pub mod email;
pub mod jwt;
pub mod password;
pub mod sanitize;
pub mod security;
pub mod time;
pub mod upload;

pub use jwt::*;
pub use password::*;
pub use time::*;
