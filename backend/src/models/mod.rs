pub mod admin;
pub mod auth;
pub mod daily_report;
pub mod intern;
pub mod lifecycle;
pub mod password_reset;
