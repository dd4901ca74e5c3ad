//! Profile-gate behaviour on protected page mounts

use assert_matches::assert_matches;
use lms_portal::handlers::pages::{self, PageStatus};
use lms_portal::services::{GateOutcome, GateState, ProfileStatus};
use serde_json::json;

use crate::helpers::*;

async fn student_context(student_number: &str) -> TestContext {
    let ctx = TestContext::new().await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;
    ctx.backend.mock_get("/api/buckets", MockResponseConfig::ok(json!([]))).await;
    ctx.sign_in(&test_token(), create_student(student_number)).await;
    ctx
}

#[tokio::test]
async fn test_missing_profile_redirects_to_completion() {
    let ctx = student_context("S123").await;
    ctx.backend.mock_profile_missing("S123").await;

    let page = pages::courses_page(&ctx.ctx).await;

    assert_eq!(page.gate, GateOutcome::Resolved(ProfileStatus::Incomplete));
    assert_eq!(page.status, PageStatus::Redirected);
    assert_eq!(ctx.ctx.navigation.current().as_deref(), Some("/complete-profile"));

    let marker = ctx.ctx.session.store().profile_checked_for().await.unwrap();
    assert_eq!(marker.as_deref(), Some("S123"));

    let lookups = ctx.backend.received_on(LOOKUP_PATH).await;
    assert_eq!(lookups.len(), 1);
    assert_eq!(lookups[0].url.query(), Some("student_number=S123"));
    assert_eq!(authorization(&lookups[0]), Some(format!("Bearer {}", test_token())));
}

#[tokio::test]
async fn test_existing_profile_lets_student_through() {
    let ctx = student_context("S123").await;
    ctx.backend
        .mock_profile_lookup("S123", MockResponseConfig::ok(json!({"data": profile_record("S123")})))
        .await;

    let page = pages::courses_page(&ctx.ctx).await;

    assert_eq!(page.gate, GateOutcome::Resolved(ProfileStatus::Complete));
    assert_eq!(page.status, PageStatus::Ready);
    assert_eq!(page.items.len(), 2);
    assert!(ctx.ctx.navigation.current().is_none());
    assert_eq!(
        ctx.ctx.profile_gate.state("S123"),
        GateState::Resolved(ProfileStatus::Complete)
    );
}

#[tokio::test]
async fn test_second_mount_does_not_recheck() {
    let ctx = student_context("S123").await;
    ctx.backend
        .mock_profile_lookup(
            "S123",
            MockResponseConfig::ok(json!({"message": "User not found."})).expect(1),
        )
        .await;

    let first = pages::courses_page(&ctx.ctx).await;
    let second = pages::buckets_page(&ctx.ctx).await;

    assert!(first.gate.redirected());
    assert_eq!(second.gate, GateOutcome::AlreadyChecked);
    assert_eq!(second.status, PageStatus::Ready);
    assert_eq!(ctx.ctx.navigation.count_of("/complete-profile"), 1);
}

#[tokio::test]
async fn test_concurrent_mounts_share_one_lookup() {
    let ctx = student_context("S123").await;
    ctx.backend
        .mock_profile_lookup(
            "S123",
            MockResponseConfig::ok(json!({"message": "User not found."}))
                .delayed(150)
                .expect(1),
        )
        .await;

    let (courses, buckets) = tokio::join!(pages::courses_page(&ctx.ctx), pages::buckets_page(&ctx.ctx));

    let outcomes = [courses.gate, buckets.gate];
    assert_eq!(outcomes.iter().filter(|o| o.redirected()).count(), 1);
    assert_eq!(outcomes.iter().filter(|o| **o == GateOutcome::AlreadyChecked).count(), 1);
    assert_eq!(ctx.ctx.navigation.count_of("/complete-profile"), 1);
}

#[tokio::test]
async fn test_admin_never_triggers_lookup() {
    let ctx = TestContext::new().await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;
    ctx.backend
        .mock_get(LOOKUP_PATH, MockResponseConfig::ok(json!({"message": "User not found."})).expect(0))
        .await;
    ctx.sign_in(&test_token(), create_admin()).await;

    let page = pages::courses_page(&ctx.ctx).await;

    assert_eq!(page.gate, GateOutcome::NotApplicable);
    assert_eq!(page.status, PageStatus::Ready);
    assert!(ctx.ctx.navigation.current().is_none());
    assert!(ctx.ctx.session.store().profile_checked_for().await.unwrap().is_none());
}

#[tokio::test]
async fn test_anonymous_mount_is_not_gated() {
    let ctx = TestContext::new().await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;
    ctx.backend
        .mock_get(LOOKUP_PATH, MockResponseConfig::ok(json!({})).expect(0))
        .await;

    let page = pages::courses_page(&ctx.ctx).await;
    assert_eq!(page.gate, GateOutcome::NotApplicable);
}

#[tokio::test]
async fn test_lookup_failure_fails_open() {
    let ctx = student_context("S123").await;
    ctx.backend.mock_profile_lookup("S123", MockResponseConfig::status(500)).await;

    let page = pages::courses_page(&ctx.ctx).await;

    assert_eq!(page.gate, GateOutcome::Resolved(ProfileStatus::Complete));
    assert_eq!(page.status, PageStatus::Ready);
    assert!(ctx.ctx.navigation.current().is_none());
    assert!(ctx.ctx.services.auth_service.is_authenticated());
}

#[tokio::test]
async fn test_new_login_checks_again() {
    let ctx = student_context("S123").await;
    ctx.backend
        .mock_profile_lookup("S123", MockResponseConfig::ok(json!({"message": "User not found."})).expect(2))
        .await;

    let first = pages::courses_page(&ctx.ctx).await;
    assert!(first.gate.redirected());

    ctx.ctx.services.auth_service.logout().await.unwrap();
    ctx.sign_in(&test_token(), create_student("S123")).await;

    let again = pages::courses_page(&ctx.ctx).await;
    assert!(again.gate.redirected());
    assert_eq!(ctx.ctx.navigation.count_of("/complete-profile"), 2);
}

#[tokio::test]
async fn test_disabled_gate_skips_check() {
    let ctx = TestContext::with_settings(|s| s.features.profile_gate = false).await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;
    ctx.backend
        .mock_get(LOOKUP_PATH, MockResponseConfig::ok(json!({})).expect(0))
        .await;
    ctx.sign_in(&test_token(), create_student("S123")).await;

    let page = pages::courses_page(&ctx.ctx).await;
    assert_matches!(page.gate, GateOutcome::NotApplicable);
}

#[tokio::test]
async fn test_headless_gate_resolves_without_navigation() {
    let ctx = TestContext::with_settings(|s| s.runtime.interactive = false).await;
    ctx.backend.mock_get("/api/courses", MockResponseConfig::ok(courses_body())).await;
    ctx.backend.mock_profile_missing("S123").await;
    ctx.sign_in(&test_token(), create_student("S123")).await;

    let page = pages::courses_page(&ctx.ctx).await;
    assert_eq!(page.gate, GateOutcome::Resolved(ProfileStatus::Incomplete));
    assert!(ctx.ctx.navigation.current().is_none());
}

#[tokio::test]
async fn test_lookup_outlived_by_logout_is_discarded() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_profile_lookup("S123", MockResponseConfig::ok(json!({"message": "User not found."})).delayed(300))
        .await;
    ctx.sign_in(&test_token(), create_student("S123")).await;

    let (outcome, _) = tokio::join!(ctx.ctx.profile_gate.on_protected_mount(), async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        ctx.ctx.services.auth_service.logout().await.expect("logout should succeed");
    });

    assert_eq!(outcome, GateOutcome::Discarded);
    assert!(ctx.ctx.session.store().profile_checked_for().await.unwrap().is_none());
    assert_eq!(ctx.ctx.navigation.count_of("/complete-profile"), 0);
    assert_eq!(ctx.ctx.profile_gate.state("S123"), GateState::NotChecked);
}

#[tokio::test]
async fn test_lookup_outlived_by_relogin_is_discarded() {
    let ctx = TestContext::new().await;
    ctx.backend
        .mock_profile_lookup("S123", MockResponseConfig::ok(json!({"message": "User not found."})).delayed(300))
        .await;
    ctx.sign_in("first-token", create_student("S123")).await;

    let (outcome, _) = tokio::join!(ctx.ctx.profile_gate.on_protected_mount(), async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        ctx.sign_in("second-token", create_student("S123")).await;
    });

    assert_eq!(outcome, GateOutcome::Discarded);
    assert!(ctx.ctx.session.store().profile_checked_for().await.unwrap().is_none());
    assert!(ctx.ctx.navigation.current().is_none());

    // the new session still gets its own check
    let again = ctx.ctx.profile_gate.on_protected_mount().await;
    assert!(again.redirected());
    assert_eq!(ctx.ctx.navigation.count_of("/complete-profile"), 1);
}
