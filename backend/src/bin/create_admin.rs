//! Seeds or updates an admin account.
//!
//! Usage: `create_admin <username> <password> [email] [full name]`, or set
//! `ADMIN_USERNAME`, `ADMIN_PASSWORD`, `ADMIN_EMAIL` and `ADMIN_FULL_NAME`.

use std::env;

use anyhow::{bail, Context};
use ims_backend::{
    config::Config, db::connection::create_pool, repositories::admin as admin_repo,
    utils::{password::hash_password, sanitize::sanitize_email},
    validation::rules::validate_password_policy,
};

struct AdminSeed {
    username: String,
    password: String,
    email: Option<String>,
    full_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_seed(mut args: impl Iterator<Item = String>) -> anyhow::Result<AdminSeed> {
    let username = non_empty(args.next().or_else(|| env::var("ADMIN_USERNAME").ok()))
        .context("admin username is required (argument 1 or ADMIN_USERNAME)")?;
    let password = args
        .next()
        .or_else(|| env::var("ADMIN_PASSWORD").ok())
        .context("admin password is required (argument 2 or ADMIN_PASSWORD)")?;
    let email = match non_empty(args.next().or_else(|| env::var("ADMIN_EMAIL").ok())) {
        Some(raw) => Some(sanitize_email(&raw).with_context(|| format!("invalid admin email: {}", raw))?),
        None => None,
    };
    let full_name = non_empty(args.next().or_else(|| env::var("ADMIN_FULL_NAME").ok()));

    if let Err(err) = validate_password_policy(&password) {
        bail!(
            "{}",
            err.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "password rejected by policy".to_string())
        );
    }

    Ok(AdminSeed {
        username,
        password,
        email,
        full_name,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "create_admin=info,ims_backend=info".into()),
        )
        .init();

    let seed = read_seed(env::args().skip(1))?;
    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let password_hash = hash_password(&seed.password)?;
    let admin = admin_repo::upsert(
        &pool,
        &seed.username,
        &password_hash,
        seed.email.as_deref(),
        seed.full_name.as_deref(),
    )
    .await
    .map_err(|err| anyhow::anyhow!("failed to save admin: {:?}", err))?;

    tracing::info!(admin_id = %admin.id, username = %admin.username, "Admin account ready");
    Ok(())
}
