//! Common helpers for end-to-end tests.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::{AdminAllowList, AdminCredential, TokenAuthority};
use crate::server::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryStore, RecordStore};
use crate::time::{ManualTimeSource, TimeSource};

/// Wall clock every test starts at.
pub const START_MS: u64 = 1_700_000_000_000;
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "hunter2";
pub const COACH_USERNAME: &str = "coach";
pub const COACH_PASSWORD: &str = "whistle";
pub const JWT_SECRET: &[u8] = b"e2e-test-secret";

/// A decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, or `Value::Null` if the body is not JSON.
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    /// The `message` field of the envelope.
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn success(&self) -> bool {
        self.body["success"].as_bool().unwrap_or(false)
    }
}

/// A router wired to a store and a manually driven clock.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn RecordStore>,
    pub clock: Arc<ManualTimeSource>,
    pub state: AppState,
}

impl TestApp {
    /// A fresh app backed by the in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(ManualTimeSource::new(START_MS));
        let store = Arc::new(MemoryStore::new(Arc::clone(&clock) as Arc<dyn TimeSource>));
        Self::with_store(store, clock, None)
    }

    /// A fresh app backed by a document store file at `path`.
    #[must_use]
    pub fn document(path: &Path) -> Self {
        let clock = Arc::new(ManualTimeSource::new(START_MS));
        let store = Arc::new(
            DocumentStore::open(path, Arc::clone(&clock) as Arc<dyn TimeSource>).unwrap(),
        );
        Self::with_store(store, clock, None)
    }

    /// An app backed by the in-memory store that serves `directory` for
    /// non-API paths.
    #[must_use]
    pub fn with_public_directory(directory: &Path) -> Self {
        let clock = Arc::new(ManualTimeSource::new(START_MS));
        let store = Arc::new(MemoryStore::new(Arc::clone(&clock) as Arc<dyn TimeSource>));
        Self::with_store(store, clock, Some(directory))
    }

    pub fn with_store(
        store: Arc<dyn RecordStore>,
        clock: Arc<ManualTimeSource>,
        public_directory: Option<&Path>,
    ) -> Self {
        let time: Arc<dyn TimeSource> = Arc::clone(&clock) as Arc<dyn TimeSource>;
        let credentials = AdminAllowList::new(vec![
            AdminCredential::new(ADMIN_USERNAME, ADMIN_PASSWORD),
            AdminCredential::new(COACH_USERNAME, COACH_PASSWORD),
        ])
        .unwrap();
        let tokens = TokenAuthority::new(JWT_SECRET, Arc::clone(&time)).unwrap();

        let state = AppState {
            store: Arc::clone(&store),
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
            clock: time,
        };
        let router = build_router(state.clone(), public_directory);

        Self {
            router,
            store,
            clock,
            state,
        }
    }

    /// Send a request with an optional bearer token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let bytes = body.map(|b| serde_json::to_vec(&b).unwrap());
        self.send(method, uri, token, bytes.map(|b| ("application/json", b)))
            .await
    }

    /// Send raw bytes with the given content type.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<(&str, Vec<u8>)>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some((content_type, bytes)) => builder
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(bytes)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Log in with the given pair and return the token.
    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Log in as the default admin.
    pub async fn login(&self) -> String {
        self.login_as(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Submit a complete application and return its id.
    pub async fn submit_application(&self, ign: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/applications",
                None,
                Some(application_body(ign)),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.body["id"].as_str().unwrap().to_string()
    }

    /// Publish a popup as `token` and return the response.
    pub async fn publish_popup(&self, token: &str, title: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/popup",
            Some(token),
            Some(serde_json::json!({ "title": title, "message": "Limited time only" })),
        )
        .await
    }
}

/// A body carrying every required application field.
pub fn application_body(ign: &str) -> Value {
    serde_json::json!({
        "ign": ign,
        "rank": "Gold",
        "region": "NA",
        "experience": "2y",
        "favoriteHero": "X",
        "whyJoin": "fun",
    })
}

/// A well-formed id that no store has issued.
pub const UNKNOWN_ID: &str = "eeeeeeeeeeeeeeeeeeeeeeee";
