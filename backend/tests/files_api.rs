use axum::http::{header, StatusCode};
use ims_backend::{models::lifecycle::ApplicationStatus, types::InternId};

mod support;

use support::{
    admin_token, get_request, integration_guard, intern_token, response_json, seed_admin,
    seed_intern, unique_suffix, TestApp, PDF_BYTES, TEST_PASSWORD,
};

async fn attach_loi(app: &TestApp, intern: InternId) -> String {
    let name = format!("loi_{}.pdf", unique_suffix());
    std::fs::write(app.upload_path(&name), PDF_BYTES).expect("write upload");
    sqlx::query("UPDATE interns SET loi_file = $2 WHERE id = $1")
        .bind(intern)
        .bind(&name)
        .execute(&app.pool)
        .await
        .expect("attach loi");
    name
}

#[tokio::test]
async fn traversal_paths_are_refused() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;
    let admin = seed_admin(&app.pool, TEST_PASSWORD).await;

    let response = app
        .send(get_request(
            "/api/files/..%2F..%2Fetc%2Fpasswd",
            Some(&admin_token(&admin)),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response_json(response).await["error"], "Access denied");
}

#[tokio::test]
async fn intern_downloads_own_document() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;
    let intern = seed_intern(&app.pool, ApplicationStatus::Active).await;
    let name = attach_loi(&app, intern.id).await;

    let response = app
        .send(get_request(&format!("/api/files/{}", name), Some(&intern_token(&intern))))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header")
        .to_string();
    assert!(disposition.contains(&name));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(&bytes[..], PDF_BYTES);
}

#[tokio::test]
async fn intern_cannot_read_another_interns_document() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;
    let owner = seed_intern(&app.pool, ApplicationStatus::Active).await;
    let snooper = seed_intern(&app.pool, ApplicationStatus::Active).await;
    let name = attach_loi(&app, owner.id).await;

    let response = app
        .send(get_request(&format!("/api/files/{}", name), Some(&intern_token(&snooper))))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response_json(response).await["error"],
        "You do not have permission to access this file"
    );
}

#[tokio::test]
async fn admin_reads_any_document_and_missing_files_are_not_found() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;
    let admin = seed_admin(&app.pool, TEST_PASSWORD).await;
    let intern = seed_intern(&app.pool, ApplicationStatus::Active).await;
    let name = attach_loi(&app, intern.id).await;
    let token = admin_token(&admin);

    let response = app
        .send(get_request(&format!("/api/files/{}", name), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(get_request("/api/files/never_uploaded.pdf", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(response).await["error"], "File not found");
}

#[tokio::test]
async fn downloads_require_a_token() {
    let _guard = integration_guard().await;
    let app = TestApp::new().await;

    let response = app.send(get_request("/api/files/anything.pdf", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
