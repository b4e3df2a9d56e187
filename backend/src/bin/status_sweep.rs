//! Moves Active interns whose leaving date has passed to Completed. The
//! dashboards run the same sweep on read; this binary is for cron.

use ims_backend::{
    config::Config, db::connection::create_pool, services::status_sweep,
    utils::time::today_local,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "status_sweep=info,ims_backend=info".into()),
        )
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let today = today_local(&config.time_zone);
    let moved = status_sweep::complete_elapsed_internships(&pool, today)
        .await
        .map_err(|err| anyhow::anyhow!("status sweep failed: {:?}", err))?;
    tracing::info!(%today, moved, "Status sweep finished");

    Ok(())
}
