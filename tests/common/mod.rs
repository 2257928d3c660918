use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use gatekeep::router::init_router;
use gatekeep::state::AppState;
use gatekeep_auth::{Claims, Role, TokenCodec};
use gatekeep_config::{CorsConfig, JwtConfig};
use gatekeep_db::{MemoryUserStore, NewUser, UserRepository};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
    pub codec: TokenCodec,
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
}

pub fn setup_test_app() -> TestApp {
    let store = Arc::new(MemoryUserStore::new());
    let jwt_config = JwtConfig::new(TEST_SECRET.to_string());
    let cors_config = CorsConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
    };
    let state = AppState::new(store.clone(), &jwt_config, cors_config);

    TestApp {
        router: init_router(state),
        store,
        codec: TokenCodec::new(TEST_SECRET.as_bytes()),
    }
}

/// Inserts a user directly into the store. Uses a low bcrypt cost to keep
/// tests fast; verification reads the cost from the hash.
pub async fn create_test_user(app: &TestApp, email: &str, password: &str, role: Role) -> TestUser {
    let password_hash = bcrypt::hash(password, 4).unwrap();
    let user = app
        .store
        .create(NewUser {
            login: email.to_string(),
            password_hash,
            role,
        })
        .await
        .unwrap();

    TestUser {
        id: user.id,
        email: user.login,
        password: password.to_string(),
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Request with `Authorization: Bearer <token>`.
    #[allow(dead_code)]
    pub async fn authed(&self, method: &str, uri: &str, token: &str, body: Option<Value>) -> (StatusCode, Value) {
        let header = format!("Bearer {}", token);
        self.request(method, uri, Some(header.as_str()), body).await
    }

    #[allow(dead_code)]
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Signs claims with the app's secret, bypassing login.
    #[allow(dead_code)]
    pub fn sign(&self, claims: &Claims) -> String {
        self.codec.encode(claims).unwrap()
    }

    #[allow(dead_code)]
    pub fn token_for(&self, user: &TestUser, role: Role) -> String {
        self.sign(&Claims::new(user.id, role, Utc::now().timestamp() + 3600))
    }
}
