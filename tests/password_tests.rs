//! Password hashing through the session service

mod common;

use common::TestApp;

#[tokio::test]
async fn test_hash_then_verify() {
    let app = TestApp::new();
    let service = &app.state.session_service;

    let hash = service.hash_password("correct horse battery staple").await.unwrap();

    assert!(hash.starts_with("$argon2id$"));
    assert!(service.verify_password("correct horse battery staple", &hash).await.unwrap());
}

#[tokio::test]
async fn test_other_password_does_not_verify() {
    let app = TestApp::new();
    let service = &app.state.session_service;

    let hash = service.hash_password("first-password").await.unwrap();

    assert!(!service.verify_password("second-password", &hash).await.unwrap());
    assert!(!service.verify_password("", &hash).await.unwrap());
}

#[tokio::test]
async fn test_empty_password_hashes() {
    let app = TestApp::new();
    let service = &app.state.session_service;

    let hash = service.hash_password("").await.unwrap();
    assert!(service.verify_password("", &hash).await.unwrap());
}

#[tokio::test]
async fn test_unparseable_hash_propagates() {
    let app = TestApp::new();
    let result = app
        .state
        .session_service
        .verify_password("pw", "$2b$12$not-an-argon-hash")
        .await;

    assert!(result.is_err());
}
