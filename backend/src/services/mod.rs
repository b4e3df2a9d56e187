pub mod attendance;
pub mod notification;
pub mod status_sweep;
