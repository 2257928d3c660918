mod common;

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use common::{create_test_user, setup_test_app};
use gatekeep_auth::{Claims, Role};
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};

fn in_one_hour() -> i64 {
    Utc::now().timestamp() + 3600
}

#[tokio::test]
async fn test_missing_header() {
    let app = setup_test_app();

    let (status, body) = app.request("GET", "/api/users", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header is missing");
}

#[tokio::test]
async fn test_empty_header_counts_as_missing() {
    let app = setup_test_app();

    let (status, body) = app.request("GET", "/api/users", Some(""), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization header is missing");
}

#[tokio::test]
async fn test_wrong_scheme() {
    let app = setup_test_app();

    let (status, body) = app.request("GET", "/api/users", Some("Token abc"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token format");
}

#[tokio::test]
async fn test_extra_parts_in_header() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;
    let token = app.token_for(&user, Role::User);

    let header = format!("Bearer {} extra", token);
    let (status, body) = app.request("GET", "/api/users", Some(header.as_str()), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token format");
}

#[tokio::test]
async fn test_garbage_token() {
    let app = setup_test_app();

    let (status, body) = app.authed("GET", "/api/users", "not.a.token", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_tampered_signature() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;
    let token = app.token_for(&user, Role::User);

    let (head, signature) = token.rsplit_once('.').unwrap();
    let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
    bytes[0] ^= 0x01;
    let tampered = format!("{}.{}", head, URL_SAFE_NO_PAD.encode(bytes));

    let (status, body) = app.authed("GET", "/api/users", &tampered, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_privilege_escalation_by_payload_edit() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;
    let token = app.token_for(&user, Role::User);

    let parts: Vec<&str> = token.split('.').collect();
    let forged_payload = json!({ "sub": user.id, "exp": in_one_hour(), "role": "admin" });
    let forged = format!(
        "{}.{}.{}",
        parts[0],
        URL_SAFE_NO_PAD.encode(forged_payload.to_string()),
        parts[2]
    );

    let (status, _) = app
        .authed("POST", "/api/users", &forged, Some(json!({ "email": "x@example.com", "password": "password123" })))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unsigned_token_rejected() {
    let app = setup_test_app();
    let admin = create_test_user(&app, "root@example.com", "hunter22", Role::Admin).await;

    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "sub": admin.id, "exp": in_one_hour(), "role": "admin" }).to_string(),
    );
    let token = format!("{}.{}.", header, payload);

    let (status, body) = app.authed("GET", "/api/users", &token, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_expired_token() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;
    let token = app.sign(&Claims::new(user.id, Role::User, Utc::now().timestamp() - 60));

    let (status, body) = app.authed("GET", "/api/users", &token, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[tokio::test]
async fn test_expired_token_is_not_logged_above_info() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = setup_test_app();
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;
    let token = app.sign(&Claims::new(user.id, Role::User, Utc::now().timestamp() - 60));

    let (status, _) = app.authed("GET", "/api/users", &token, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let output = logs.contents();
    assert!(output.contains("status=401"), "request was not logged: {output}");
    assert!(!output.contains("WARN"), "expiry logged above info: {output}");
    assert!(!output.contains("ERROR"), "expiry logged above info: {output}");
}

#[tokio::test]
async fn test_deleted_user_token_rejected_before_expiry() {
    let app = setup_test_app();
    let admin = create_test_user(&app, "root@example.com", "hunter22", Role::Admin).await;
    let bob = create_test_user(&app, "bob@example.com", "builder1", Role::User).await;
    let admin_token = app.login(&admin.email, &admin.password).await;
    let bob_token = app.login(&bob.email, &bob.password).await;

    let (status, _) = app.authed("GET", "/api/users/me", &bob_token, None).await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/users/{}", bob.id);
    let (status, _) = app.authed("DELETE", &uri, &admin_token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.authed("GET", "/api/users/me", &bob_token, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_missing_role_claim_is_forbidden() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;
    let token = app.sign(&Claims {
        sub: user.id,
        exp: in_one_hour(),
        role: None,
    });

    let (status, body) = app.authed("GET", "/api/users", &token, None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Role claim is missing");
}

#[tokio::test]
async fn test_user_role_forbidden_on_admin_route() {
    let app = setup_test_app();
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;
    let token = app.login(&user.email, &user.password).await;

    let (status, body) = app
        .authed(
            "POST",
            "/api/users",
            &token,
            Some(json!({ "email": "eve@example.com", "password": "password123" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You do not have access to this resource");
}

#[tokio::test]
async fn test_both_roles_admitted_on_member_route() {
    let app = setup_test_app();
    let admin = create_test_user(&app, "root@example.com", "hunter22", Role::Admin).await;
    let user = create_test_user(&app, "alice@example.com", "wonderland", Role::User).await;

    for token in [app.token_for(&admin, Role::Admin), app.token_for(&user, Role::User)] {
        let (status, _) = app.authed("GET", "/api/users", &token, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_authorization_uses_token_role() {
    let app = setup_test_app();
    // Stored as admin, but the token says user.
    let admin = create_test_user(&app, "root@example.com", "hunter22", Role::Admin).await;
    let token = app.token_for(&admin, Role::User);

    let (status, _) = app.authed("DELETE", "/api/users/1", &token, None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = setup_test_app();

    let (status, _) = app.request("GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
}
