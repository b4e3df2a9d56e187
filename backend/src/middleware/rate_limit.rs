//! Per-IP rate limits: a tight one on `/api/login` and a looser one over the
//! whole `/api` tree. Both are token buckets keyed by peer address, so the
//! server must be served with `into_make_service_with_connect_info`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Response, StatusCode};
use governor::middleware::StateInformationMiddleware;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor, GovernorError,
    GovernorLayer,
};

use crate::config::Config;

pub type IpRateLimitLayer = GovernorLayer<PeerIpKeyExtractor, StateInformationMiddleware, Body>;

pub const LOGIN_LIMIT_MESSAGE: &str =
    "Too many login attempts from this IP, please try again after 15 minutes";
pub const GLOBAL_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again after 15 minutes";

/// Replenish interval that lets `max_requests` through per `window_seconds`
/// on average, with the whole allowance available as an initial burst.
fn replenish_period(max_requests: u32, window_seconds: u64) -> Duration {
    let window_ms = window_seconds.max(1).saturating_mul(1000);
    Duration::from_millis((window_ms / u64::from(max_requests.max(1))).max(1))
}

fn ip_rate_limiter(
    max_requests: u32,
    window_seconds: u64,
    error_handler: fn(GovernorError) -> Response<Body>,
) -> anyhow::Result<IpRateLimitLayer> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .period(replenish_period(max_requests, window_seconds))
            .burst_size(max_requests.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .use_headers()
            .finish()
            .context("rate limiter configuration is invalid")?,
    );
    Ok(GovernorLayer::new(governor_conf).error_handler(error_handler))
}

pub fn create_login_rate_limiter(config: &Config) -> anyhow::Result<IpRateLimitLayer> {
    ip_rate_limiter(
        config.rate_limit_login_max_requests,
        config.rate_limit_login_window_seconds,
        login_limit_error_handler,
    )
}

pub fn create_global_rate_limiter(config: &Config) -> anyhow::Result<IpRateLimitLayer> {
    ip_rate_limiter(
        config.rate_limit_global_max_requests,
        config.rate_limit_global_window_seconds,
        global_limit_error_handler,
    )
}

fn login_limit_error_handler(error: GovernorError) -> Response<Body> {
    limit_error_response(error, LOGIN_LIMIT_MESSAGE)
}

fn global_limit_error_handler(error: GovernorError) -> Response<Body> {
    limit_error_response(error, GLOBAL_LIMIT_MESSAGE)
}

fn limit_error_response(error: GovernorError, message: &str) -> Response<Body> {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::warn!(wait_time, "Rate limit exceeded");
            let mut response = json_error_response(
                StatusCode::TOO_MANY_REQUESTS,
                message,
                "RATE_LIMITED",
                Some(wait_time),
            );
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => json_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to determine request identity.",
            "RATE_LIMIT_KEY_ERROR",
            None,
        ),
        GovernorError::Other { code, msg, headers } => {
            let mut response = json_error_response(
                code,
                &msg.unwrap_or_else(|| "Rate limit error".to_string()),
                "RATE_LIMIT_ERROR",
                None,
            );
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

fn json_error_response(
    status: StatusCode,
    message: &str,
    code: &str,
    retry_after: Option<u64>,
) -> Response<Body> {
    let body = serde_json::json!({
        "error": message,
        "code": code,
    });

    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(retry_after) = retry_after {
        if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
            response.headers_mut().insert("retry-after", value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn replenish_period_spreads_allowance_over_window() {
        assert_eq!(replenish_period(5, 900), Duration::from_secs(180));
        assert_eq!(replenish_period(100, 900), Duration::from_millis(9000));
    }

    #[test]
    fn replenish_period_handles_zero_values() {
        assert_eq!(replenish_period(0, 0), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn too_many_requests_carries_message_and_retry_after() {
        let response = login_limit_error_handler(GovernorError::TooManyRequests {
            wait_time: 42,
            headers: None,
        });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("retry-after").unwrap(), "42");
        let json = body_json(response).await;
        assert_eq!(json["error"], LOGIN_LIMIT_MESSAGE);
        assert_eq!(json["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn unable_to_extract_key_is_internal_error() {
        let response = global_limit_error_handler(GovernorError::UnableToExtractKey);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn other_error_keeps_status_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-test", HeaderValue::from_static("1"));
        let response = global_limit_error_handler(GovernorError::Other {
            code: StatusCode::BAD_GATEWAY,
            msg: None,
            headers: Some(headers),
        });
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(response.headers().get("x-test").unwrap(), "1");
    }
}
