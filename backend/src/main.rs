use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ims_backend::{
    build_router,
    config::Config,
    db::connection::{create_pool, DbPool},
    services::notification::{spawn_notification_worker, NotificationQueue},
    state::AppState,
    utils::email::mailer_from_settings,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ims_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Unhandled panic");
    }));

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        jwt_secret = %mask_secret(&config.jwt_secret),
        jwt_expiration_hours = config.jwt_expiration_hours,
        time_zone = %config.time_zone,
        frontend_url = %config.frontend_url,
        upload_dir = %config.upload_dir.display(),
        smtp_host = %config.smtp.host,
        smtp_skip_send = config.smtp.skip_send,
        rate_limit_enabled = config.rate_limit_enabled,
        "Loaded configuration from environment/.env"
    );

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // Initialize database
    let pool: DbPool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Outgoing mail runs on its own task
    let mailer = mailer_from_settings(&config.smtp)?;
    let (notifier, receiver) = NotificationQueue::new();
    spawn_notification_worker(receiver, mailer);

    let bind_addr = config.bind_addr;
    let app = build_router(AppState::new(pool, config, notifier))?;

    tracing::info!("Server listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
