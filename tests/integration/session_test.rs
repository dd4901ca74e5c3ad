//! Session, credential injection and 401 recovery

use std::time::Duration;
use assert_matches::assert_matches;
use lms_portal::services::notification::SESSION_EXPIRED_MESSAGE;
use lms_portal::services::NotificationLevel;
use lms_portal::{ApiError, PortalError};
use serde_json::json;

use crate::helpers::*;
use crate::integration::notices_with;

#[tokio::test]
async fn test_signed_in_requests_carry_bearer_header() {
    let ctx = TestContext::new().await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;
    ctx.sign_in(&test_token(), create_admin()).await;

    let courses = ctx.ctx.services.catalog_service.courses().await.expect("courses should load");
    assert_eq!(courses.len(), 2);

    let requests = ctx.backend.received_on("/api/courses").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(authorization(&requests[0]), Some(format!("Bearer {}", test_token())));
}

#[tokio::test]
async fn test_anonymous_requests_have_no_authorization_header() {
    let ctx = TestContext::new().await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;

    ctx.ctx.services.catalog_service.courses().await.expect("courses should load");

    ctx.sign_in(&test_token(), create_admin()).await;
    ctx.ctx.services.auth_service.logout().await.expect("logout should succeed");
    ctx.ctx.services.catalog_service.courses().await.expect("courses should load");

    let requests = ctx.backend.received_on("/api/courses").await;
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| authorization(r).is_none()));
}

#[tokio::test]
async fn test_login_persists_session_and_attaches_token() {
    let ctx = TestContext::new().await;
    let student = create_student("S123");
    ctx.backend.mock_login("login-token", &student).await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;

    let user = ctx
        .ctx
        .services
        .auth_service
        .login("s123@students.lms.test", "secret")
        .await
        .expect("login should succeed");
    assert_eq!(user, student);
    assert!(ctx.ctx.services.auth_service.is_authenticated());
    assert!(ctx.durable.contains("token").await);
    assert!(ctx.durable.contains("user").await);

    ctx.ctx.services.catalog_service.courses().await.expect("courses should load");
    let requests = ctx.backend.received_on("/api/courses").await;
    assert_eq!(authorization(&requests[0]).as_deref(), Some("Bearer login-token"));

    let login = ctx.backend.received_on("/api/auth/login").await;
    assert!(authorization(&login[0]).is_none());
}

#[tokio::test]
async fn test_login_rejected_by_body_keeps_signed_out() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_post(
            "/api/auth/login",
            MockResponseConfig::ok(json!({"success": false, "message": "Invalid credentials"})),
        )
        .await;

    let err = ctx
        .ctx
        .services
        .auth_service
        .login("someone@lms.test", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err.rejection(), Some("Invalid credentials"));
    assert!(!ctx.ctx.services.auth_service.is_authenticated());
    assert!(!ctx.durable.contains("token").await);
}

#[tokio::test]
async fn test_restore_round_trips_persisted_session() {
    let first = TestContext::new().await;
    first.sign_in(&test_token(), create_student("S123")).await;

    // second context over the same durable store
    let transport = std::sync::Arc::new(
        lms_portal::services::HttpTransport::new(&first.ctx.settings.api).expect("transport"),
    );
    let second = lms_portal::AppContext::build(first.ctx.settings.clone(), first.durable.clone(), transport);

    let restored = second.services.auth_service.restore().await.expect("restore should succeed");
    let session = restored.expect("session should be restored");
    assert_eq!(session.token, test_token());
    assert_eq!(session.user.student_number(), Some("S123"));
    assert!(second.services.auth_service.is_authenticated());
}

#[tokio::test]
async fn test_concurrent_401s_expire_session_once() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/courses", MockResponseConfig::status(401).delayed(200))
        .await;
    ctx.sign_in(&test_token(), create_admin()).await;

    let catalog = &ctx.ctx.services.catalog_service;
    let (a, b, c) = tokio::join!(catalog.courses(), catalog.courses(), catalog.courses());

    for result in [a, b, c] {
        let err = result.unwrap_err();
        assert!(err.is_unauthorized());
        assert_matches!(err, PortalError::Api(ApiError::Status { status: 401, .. }));
    }

    assert!(!ctx.ctx.services.auth_service.is_authenticated());
    assert!(!ctx.durable.contains("token").await);
    assert!(!ctx.durable.contains("user").await);
    assert_eq!(ctx.durable.removals_of("token"), 1);
    assert_eq!(ctx.ctx.navigation.count_of("/login"), 1);

    let notices = notices_with(&ctx, SESSION_EXPIRED_MESSAGE);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NotificationLevel::Warning);
}

#[tokio::test]
async fn test_stale_401_does_not_wipe_newer_session() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_get("/api/courses", MockResponseConfig::status(401).delayed(300))
        .await;
    ctx.sign_in("old-token", create_admin()).await;

    let (result, _) = tokio::join!(ctx.ctx.services.catalog_service.courses(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        ctx.sign_in("new-token", create_student("S123")).await;
    });

    assert!(result.unwrap_err().is_unauthorized());
    let user = ctx.ctx.session.current_user().expect("newer session survives");
    assert_eq!(user.student_number(), Some("S123"));
    assert!(ctx.durable.contains("token").await);
    assert_eq!(ctx.ctx.navigation.count_of("/login"), 0);
    assert!(notices_with(&ctx, SESSION_EXPIRED_MESSAGE).is_empty());
}

#[tokio::test]
async fn test_headless_runtime_leaves_session_on_401() {
    let ctx = TestContext::with_settings(|s| s.runtime.interactive = false).await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::status(401)).await;
    ctx.sign_in(&test_token(), create_admin()).await;

    let err = ctx.ctx.services.catalog_service.courses().await.unwrap_err();
    assert!(err.is_unauthorized());

    assert!(ctx.ctx.services.auth_service.is_authenticated());
    assert!(ctx.durable.contains("token").await);
    assert!(ctx.ctx.navigation.current().is_none());
    assert!(ctx.ctx.notifications.active().is_empty());
}

#[tokio::test]
async fn test_other_failures_pass_through_untouched() {
    let ctx = TestContext::new().await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::status(503)).await;
    ctx.sign_in(&test_token(), create_admin()).await;

    let err = ctx.ctx.services.catalog_service.courses().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_recoverable());
    assert!(ctx.ctx.services.auth_service.is_authenticated());
    assert!(ctx.ctx.navigation.current().is_none());
}
