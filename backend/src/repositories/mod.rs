pub mod admin;
pub mod daily_report;
pub mod intern;
pub mod password_reset;
pub mod transaction;

pub use transaction::*;
