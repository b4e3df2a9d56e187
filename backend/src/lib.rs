use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use crate::config::Config;
use crate::middleware::rate_limit::{create_global_rate_limiter, create_login_rate_limiter};
use crate::state::AppState;

/// Multipart bodies carry up to three files plus text fields.
const MULTIPART_FILES_PER_REQUEST: usize = 4;

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(24 * 60 * 60))
}

/// Assembles every route group with its gate and the shared layers.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let config = state.config.clone();

    let mut login_routes = Router::new().route("/api/login", post(handlers::auth::login));
    if config.rate_limit_enabled {
        login_routes = login_routes.layer(create_login_rate_limiter(&config)?);
    }

    let public_routes = Router::new()
        .route("/api/logout", post(handlers::auth::logout))
        .route("/api/apply", post(handlers::applications::submit_application))
        .route(
            "/api/request-password-reset",
            post(handlers::password_reset::request_password_reset),
        )
        .route(
            "/api/verify-reset-token/{token}",
            get(handlers::password_reset::verify_reset_token),
        )
        .route(
            "/api/reset-password/{token}",
            post(handlers::password_reset::reset_password),
        )
        .merge(login_routes);

    // Holding the link is the credential; the extractor validates the id.
    let capability_routes = Router::new().route(
        "/api/enroll/{id}",
        get(handlers::enrollment::get_enrollment_form)
            .post(handlers::enrollment::submit_enrollment),
    );

    let intern_routes = Router::new()
        .route("/api/intern/profile", get(handlers::intern::my_profile))
        .route("/api/intern/reports", get(handlers::intern::my_reports))
        .route("/api/intern/report", post(handlers::intern::submit_daily_report))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_intern,
        ));

    let admin_routes = Router::new()
        .route(
            "/api/admin/dashboard/fresh",
            get(handlers::admin::fresh_applications),
        )
        .route(
            "/api/admin/dashboard/pending",
            get(handlers::admin::pending_applications),
        )
        .route(
            "/api/admin/dashboard/rejected",
            get(handlers::admin::rejected_applications),
        )
        .route(
            "/api/admin/dashboard/ongoing",
            get(handlers::admin::ongoing_interns),
        )
        .route(
            "/api/admin/dashboard/completed",
            get(handlers::admin::completed_interns),
        )
        .route("/api/admin/intern/{id}", get(handlers::admin::intern_detail))
        .route("/api/admin/decision", post(handlers::admin::decide_on_fresh))
        .route("/api/admin/onboard", post(handlers::admin::finalize_onboarding))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    let authenticated_routes = Router::new()
        .route("/api/files/{*path}", get(handlers::files::download_file))
        .route(
            "/api/change-password",
            post(handlers::auth::change_password),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_authenticated,
        ));

    let mut api = Router::new()
        .merge(public_routes)
        .merge(capability_routes)
        .merge(intern_routes)
        .merge(admin_routes)
        .merge(authenticated_routes);
    if config.rate_limit_enabled {
        api = api.layer(create_global_rate_limiter(&config)?);
    }

    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/docs.json", docs::ApiDoc::openapi()))
        .merge(api)
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes.saturating_mul(MULTIPART_FILES_PER_REQUEST),
        ))
        .layer(axum_middleware::from_fn(middleware::log_error_responses))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config)),
        )
        .with_state(state);

    Ok(app)
}
