use anyhow::Context;
use ims_backend::{
    config::Config, db::connection::create_pool,
    repositories::password_reset as password_reset_repo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "token_cleanup=info,ims_backend=info".into()),
        )
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let deleted_count = password_reset_repo::delete_expired_tokens(&pool)
        .await
        .map_err(|err| anyhow::anyhow!("{:?}", err))
        .context("cleanup expired password reset tokens")?;

    if deleted_count > 0 {
        tracing::info!("Deleted {} expired or used password reset tokens", deleted_count);
    }

    sqlx::query("VACUUM (ANALYZE) password_reset_tokens")
        .execute(&pool)
        .await
        .context("vacuum password_reset_tokens table")?;

    Ok(())
}
