use axum::http::StatusCode;
use ims_backend::{
    models::{auth::UserType, lifecycle::ApplicationStatus},
    utils::jwt::{create_access_token, Claims},
};
use serde_json::json;

mod support;

use support::{
    admin_token, get_request, integration_guard, intern_token, json_request, response_json,
    seed_admin, seed_intern, TestApp, TEST_JWT_SECRET, TEST_PASSWORD,
};

const ADMIN_GETS: &[&str] = &[
    "/api/admin/dashboard/fresh",
    "/api/admin/dashboard/pending",
    "/api/admin/dashboard/rejected",
    "/api/admin/dashboard/ongoing",
    "/api/admin/dashboard/completed",
    "/api/admin/intern/1",
];

#[tokio::test]
async fn admin_routes_refuse_missing_tokens() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;

    for uri in ADMIN_GETS {
        let response = app.send(get_request(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            response_json(response).await["error"],
            "Authorization token missing."
        );
    }
}

#[tokio::test]
async fn admin_routes_refuse_intern_tokens() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;
    let intern = seed_intern(&app.pool, ApplicationStatus::Active).await;
    let token = intern_token(&intern);

    for uri in ADMIN_GETS {
        let response = app.send(get_request(uri, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/decision",
            Some(&token),
            json!({ "id": intern.id.get(), "decision": "Approved" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response_json(response).await["error"], "Insufficient privileges.");
}

#[tokio::test]
async fn intern_routes_refuse_admin_tokens() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;
    let admin = seed_admin(&app.pool, TEST_PASSWORD).await;
    let token = admin_token(&admin);

    for uri in ["/api/intern/profile", "/api/intern/reports"] {
        let response = app.send(get_request(uri, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn tampered_and_foreign_tokens_are_unauthorized() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;
    let admin = seed_admin(&app.pool, TEST_PASSWORD).await;

    let mut tampered = admin_token(&admin);
    tampered.push('x');
    let response = app
        .send(get_request("/api/admin/dashboard/fresh", Some(&tampered)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let claims = Claims::new(
        admin.id.get(),
        admin.username.clone(),
        "Admin".to_string(),
        UserType::Admin,
        1,
    );
    let foreign = create_access_token(&claims, "a-completely-different-secret-of-length")
        .expect("encode");
    let response = app
        .send(get_request("/api/admin/dashboard/fresh", Some(&foreign)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let valid = create_access_token(&claims, TEST_JWT_SECRET).expect("encode");
    let response = app
        .send(get_request("/api/admin/dashboard/fresh", Some(&valid)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}
