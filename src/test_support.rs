//! Shared helpers for router-level tests: an app wired to the in-memory
//! store, token minting, and a one-shot request helper.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_router,
    config::Config,
    repos::memory::InMemoryPostStore,
    services::{auth::build_auth_service, id_codec::IdCodec},
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";

pub fn sign_claims<T: Serialize>(claims: &T) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn token_for(user_id: Uuid) -> String {
    sign_claims(&json!({
        "sub": user_id.to_string(),
        "iat": Utc::now().timestamp(),
        "exp": Utc::now().timestamp() + 3600,
    }))
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryPostStore>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::for_tests())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(InMemoryPostStore::new());
        let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet).unwrap();
        let state = AppState::new(
            store.clone(),
            id_codec,
            build_auth_service(&config),
            &config.service_name,
        );
        let router = build_router(state, &config);

        Self {
            router,
            store,
            config,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Request as `user_id` with a freshly minted token.
    pub async fn as_user(
        &self,
        user_id: Uuid,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let auth = format!("Bearer {}", token_for(user_id));
        self.request(method, uri, Some(&auth), body).await
    }

    /// Request as `user_id` with a body sent verbatim (no content type unless given).
    pub async fn as_user_raw(
        &self,
        user_id: Uuid,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)));
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn create_post(&self, user_id: Uuid, body: Value) -> Value {
        let (status, post) = self
            .as_user(user_id, Method::POST, "/api/posts", Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{post}");
        post
    }
}
