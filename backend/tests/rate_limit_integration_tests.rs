use std::{net::SocketAddr, path::PathBuf, time::Duration};

use axum::{http::StatusCode, routing::post, Router};
use tokio::net::TcpListener;

use ims_backend::{
    config::{Config, SmtpSettings},
    middleware::rate_limit::{create_login_rate_limiter, LOGIN_LIMIT_MESSAGE},
};

fn test_config(login_max_requests: u32, login_window_seconds: u64) -> Config {
    Config {
        database_url: "test://".to_string(),
        jwt_secret: "test-jwt-secret-32-chars-minimum!".to_string(),
        jwt_expiration_hours: 1,
        time_zone: chrono_tz::Asia::Kolkata,
        bind_addr: "127.0.0.1:0".parse().expect("bind addr"),
        frontend_url: "http://localhost:3759".to_string(),
        upload_dir: PathBuf::from("uploads"),
        nda_template_path: PathBuf::from("uploads/nda/nda.pdf"),
        max_upload_bytes: 1024,
        onboarding_recipients: Vec::new(),
        smtp: SmtpSettings {
            host: "localhost".to_string(),
            port: 2525,
            username: String::new(),
            password: String::new(),
            from_address: "noreply@ims.local".to_string(),
            skip_send: true,
        },
        cors_allow_origins: vec!["http://localhost:3759".to_string()],
        rate_limit_enabled: true,
        rate_limit_login_max_requests: login_max_requests,
        rate_limit_login_window_seconds: login_window_seconds,
        rate_limit_global_max_requests: 100,
        rate_limit_global_window_seconds: 900,
    }
}

async fn spawn_rate_limited_app(config: Config) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let limiter = create_login_rate_limiter(&config).expect("limiter");

    let app = Router::new()
        .route("/api/login", post(|| async { StatusCode::OK }))
        .route_layer(limiter);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    let handle = tokio::spawn(async move {
        server.await.expect("server should run");
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, handle)
}

#[tokio::test]
async fn login_limit_blocks_after_burst() {
    let (addr, handle) = spawn_rate_limited_app(test_config(2, 900)).await;

    let client = reqwest::Client::new();
    let url = format!("http://{}/api/login", addr);

    for _ in 0..2 {
        let resp = client.post(&url).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client.post(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "RATE_LIMITED");
    assert_eq!(body["error"], LOGIN_LIMIT_MESSAGE);

    handle.abort();
}

#[tokio::test]
async fn limited_responses_carry_rate_limit_headers() {
    let (addr, handle) = spawn_rate_limited_app(test_config(1, 900)).await;

    let client = reqwest::Client::new();
    let url = format!("http://{}/api/login", addr);

    let _ = client.post(&url).send().await.unwrap();
    let resp = client.post(&url).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("x-ratelimit-after"));

    handle.abort();
}
