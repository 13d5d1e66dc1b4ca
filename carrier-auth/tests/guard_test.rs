//! Token checks, principal type guards and moderator status guards.

mod common;

use axum::http::{Method, StatusCode};
use common::{token_of, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_missing_or_garbage_token_is_unauthorized() {
    let app = TestApp::spawn();

    let (status, body) = app.call(Method::GET, "/auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app
        .call(Method::GET, "/auth/profile", Some("not.a.jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_rejected() {
    let app = TestApp::spawn();
    let body = app.register_user("dana@example.com").await;

    let mut other = common::test_config();
    other.jwt.secret = "a-completely-different-secret-value".to_string();
    let foreign = TestApp::with_config(other);
    let forged = foreign.forge_token(body["user"]["id"].as_str().unwrap(), "user");

    let (status, _) = app
        .call(Method::GET, "/users/me", Some(&forged), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_principal_type_is_rejected() {
    let app = TestApp::spawn();
    let token = app.forge_token(&Uuid::new_v4().to_string(), "admin");

    let (status, body) = app
        .call(Method::GET, "/auth/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token type");
}

#[tokio::test]
async fn test_token_for_unknown_subject_is_rejected() {
    let app = TestApp::spawn();
    let token = app.forge_token(&Uuid::new_v4().to_string(), "user");

    let (status, _) = app
        .call(Method::GET, "/users/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_company_token_cannot_reach_user_routes() {
    let app = TestApp::spawn();
    let token = token_of(&app.register_company("ops@acme.example").await);

    let (status, _) = app.call(Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::PATCH,
            "/users/complete-profile",
            Some(&token),
            Some(json!({ "firstName": "A", "lastName": "B" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_token_cannot_reach_company_routes() {
    let app = TestApp::spawn();
    let token = token_of(&app.register_user("dana@example.com").await);

    let (status, _) = app
        .call(Method::GET, "/companies/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_moderators_are_forbidden_from_moderator_routes() {
    let app = TestApp::spawn();
    let user = token_of(&app.register_user("dana@example.com").await);
    let company = token_of(&app.register_company("ops@acme.example").await);

    for token in [&user, &company] {
        let (status, _) = app
            .call(Method::GET, "/moderators", Some(token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_suspension_revokes_existing_moderator_token() {
    let app = TestApp::spawn();
    let admin = token_of(&app.register_moderator("admin@example.com").await);
    let target = app.register_moderator("target@example.com").await;
    let target_token = token_of(&target);
    let target_id = target["moderator"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(Method::GET, "/moderators", Some(&target_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::PATCH,
            &format!("/moderators/{}/suspend", target_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUSPENDED");

    // Same token, issued while ACTIVE
    let (status, _) = app
        .call(Method::GET, "/moderators", Some(&target_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Still authenticated, only the moderator guard fails
    let (status, body) = app
        .call(Method::GET, "/auth/profile", Some(&target_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUSPENDED");

    let (status, _) = app
        .call(
            Method::POST,
            "/auth/moderator/login",
            None,
            Some(json!({ "email": "target@example.com", "password": common::TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/moderators/{}/approve", target_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::GET, "/moderators", Some(&target_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_moderator_verifies_company() {
    let app = TestApp::spawn();
    let moderator = app.register_moderator("mod@example.com").await;
    let moderator_token = token_of(&moderator);
    let company = app.register_company("ops@acme.example").await;
    let company_token = token_of(&company);
    let company_id = company["company"]["id"].as_str().unwrap().to_string();

    // Companies cannot verify themselves
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/companies/verify/{}", company_id),
            Some(&company_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/companies/verify/{}", company_id),
            Some(&moderator_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registrationStatus"], "VERIFIED");
    assert_eq!(body["isVerified"], true);
    assert!(body["verifiedAt"].is_string());

    // Completing the profile afterwards keeps VERIFIED
    let (status, body) = app
        .call(
            Method::PATCH,
            "/companies/complete-profile",
            Some(&company_token),
            Some(json!({ "name": "Acme Freight Lines" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Freight Lines");
    assert_eq!(body["registrationStatus"], "VERIFIED");
}

#[tokio::test]
async fn test_moderator_admin_routes_return_not_found_for_unknown_ids() {
    let app = TestApp::spawn();
    let token = token_of(&app.register_moderator("mod@example.com").await);
    let missing = Uuid::new_v4();

    let (status, _) = app
        .call(Method::GET, &format!("/moderators/{}", missing), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/companies/verify/{}", missing),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/moderators/{}", missing),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moderator_update_changes_role() {
    let app = TestApp::spawn();
    let token = token_of(&app.register_moderator("admin@example.com").await);
    let target = app.register_moderator("target@example.com").await;
    let target_id = target["moderator"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(
            Method::PATCH,
            &format!("/moderators/{}", target_id),
            Some(&token),
            Some(json!({ "role": "SENIOR_MOD", "lastName": "Reyes-Ortiz" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "SENIOR_MOD");
    assert_eq!(body["lastName"], "Reyes-Ortiz");
    assert_eq!(body["firstName"], "Mo");

    let (_, list) = app.call(Method::GET, "/moderators", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert!(list[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_route_is_rate_limited_per_ip() {
    let mut config = common::test_config();
    config.rate_limit.login_attempts = 2;
    config.rate_limit.login_window_seconds = 3600;
    let app = TestApp::with_config(config);

    let attempt = json!({ "email": "nobody@example.com", "password": "whatever1" });
    for _ in 0..2 {
        let (status, _) = app
            .call(Method::POST, "/auth/login", None, Some(attempt.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = app
        .call(Method::POST, "/auth/login", None, Some(attempt))
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}
