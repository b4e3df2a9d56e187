use crate::{
    config::Config, db::connection::DbPool, services::notification::NotificationQueue,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Config,
    /// Sender half of the mail worker channel. Handlers enqueue and move on.
    pub notifier: NotificationQueue,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config, notifier: NotificationQueue) -> Self {
        Self {
            pool,
            config,
            notifier,
        }
    }

    pub fn today(&self) -> chrono::NaiveDate {
        crate::utils::time::today_local(&self.config.time_zone)
    }
}
