#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use deck_api_rust::auth::{AuthenticatedUser, IdentityProvider, JwtIdentityProvider};
use deck_api_rust::config::AppConfig;
use deck_api_rust::models::{Deck, DeckCreatePayload, DeckUpdatePayload};
use deck_api_rust::services::{DeckService, DomainError, DomainResult, InMemoryDeckService};
use deck_api_rust::{app, AppState};

pub const OWNER: &str = "user-owner";
pub const DECK_ID: &str = "deck-123";

// --- Identity doubles -------------------------------------------------------

/// Identity provider with a fixed answer
pub struct StubIdentity {
    user: Option<AuthenticatedUser>,
    fail: bool,
}

impl StubIdentity {
    pub fn signed_in() -> Self {
        Self {
            user: Some(AuthenticatedUser::new(OWNER)),
            fail: false,
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None, fail: false }
    }

    pub fn broken() -> Self {
        Self { user: None, fail: true }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn resolve_caller(&self, _headers: &HeaderMap) -> anyhow::Result<Option<AuthenticatedUser>> {
        if self.fail {
            anyhow::bail!("session store unreachable at redis://10.1.2.3:6379");
        }
        Ok(self.user.clone())
    }
}

// --- Deck service double ----------------------------------------------------

/// What every service call does
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Domain(DomainError),
    Unexpected(&'static str),
    Panic,
}

#[derive(Default)]
pub struct Calls {
    pub list: AtomicUsize,
    pub get: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
    pub last_update: Mutex<Option<(String, DeckUpdatePayload)>>,
}

impl Calls {
    pub fn total(&self) -> usize {
        [&self.list, &self.get, &self.create, &self.update, &self.delete]
            .iter()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

pub struct ScriptedDeckService {
    behavior: Behavior,
    deck: Deck,
    calls: Arc<Calls>,
}

impl ScriptedDeckService {
    /// Raise-style outcome shared by list, get and delete
    fn raise<T>(&self, value: T) -> anyhow::Result<T> {
        match &self.behavior {
            Behavior::Succeed => Ok(value),
            Behavior::Domain(err) => Err(err.clone().into()),
            Behavior::Unexpected(msg) => Err(anyhow::anyhow!(*msg)),
            Behavior::Panic => panic!("scripted deck service panic"),
        }
    }

    /// Result-style outcome shared by create and update
    fn explicit<T>(&self, value: T) -> anyhow::Result<DomainResult<T>> {
        match &self.behavior {
            Behavior::Succeed => Ok(Ok(value)),
            Behavior::Domain(err) => Ok(Err(err.clone())),
            Behavior::Unexpected(msg) => Err(anyhow::anyhow!(*msg)),
            Behavior::Panic => panic!("scripted deck service panic"),
        }
    }
}

#[async_trait]
impl DeckService for ScriptedDeckService {
    async fn list(&self, _user: &AuthenticatedUser) -> anyhow::Result<Vec<Deck>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        self.raise(vec![self.deck.clone()])
    }

    async fn get_by_id(&self, _user: &AuthenticatedUser, _deck_id: &str) -> anyhow::Result<Deck> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.raise(self.deck.clone())
    }

    async fn create(
        &self,
        _user: &AuthenticatedUser,
        payload: DeckCreatePayload,
    ) -> anyhow::Result<DomainResult<Deck>> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let mut deck = self.deck.clone();
        deck.name = payload.name;
        deck.description = payload.description;
        deck.is_public = payload.is_public;
        self.explicit(deck)
    }

    async fn update(
        &self,
        _user: &AuthenticatedUser,
        deck_id: &str,
        payload: DeckUpdatePayload,
    ) -> anyhow::Result<DomainResult<Deck>> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        *self.calls.last_update.lock().unwrap() = Some((deck_id.to_string(), payload.clone()));

        let mut deck = self.deck.clone();
        let touched_at = deck.updated_at;
        payload.apply_to(&mut deck, touched_at);
        self.explicit(deck)
    }

    async fn delete(&self, _user: &AuthenticatedUser, _deck_id: &str) -> anyhow::Result<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.raise(())
    }
}

pub fn sample_deck() -> Deck {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Deck {
        id: DECK_ID.to_string(),
        user_id: OWNER.to_string(),
        name: "Spanish verbs".to_string(),
        description: Some("Irregular preterite".to_string()),
        is_public: false,
        created_at: t,
        updated_at: t,
    }
}

// --- Router harness ---------------------------------------------------------

pub struct Harness {
    pub app: Router,
    pub calls: Arc<Calls>,
}

pub fn harness(identity: StubIdentity, behavior: Behavior) -> Harness {
    let calls = Arc::new(Calls::default());
    let service = ScriptedDeckService {
        behavior,
        deck: sample_deck(),
        calls: Arc::clone(&calls),
    };

    let config = AppConfig::development();
    let state = AppState::new(Arc::new(identity), Arc::new(service), &config);

    Harness {
        app: app(state, &config),
        calls,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({}): {:?}", e, String::from_utf8_lossy(&self.body)))
    }

    /// Assert the standard error contract and return the body
    pub fn assert_error(&self, status: StatusCode, code: &str) -> Value {
        assert_eq!(self.status, status, "unexpected status, body: {}", String::from_utf8_lossy(&self.body));
        let body = self.json();
        assert_eq!(body["error"], code, "unexpected code in {}", body);
        assert!(body["message"].is_string(), "missing message in {}", body);
        body
    }
}

/// A well-formed update body larger than the development body limit
pub fn oversized_body() -> String {
    let limit = AppConfig::development().api.max_request_size_bytes;
    format!(r#"{{"name":"{}"}}"#, "x".repeat(limit * 2))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse { status, body }
}

// --- Live server ------------------------------------------------------------

pub const LIVE_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub decks: InMemoryDeckService,
}

/// Serve the real router on a free port for the lifetime of the current runtime
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let decks = InMemoryDeckService::new();
    let config = AppConfig::development();
    let state = AppState::new(
        Arc::new(JwtIdentityProvider::new(LIVE_SECRET)),
        Arc::new(decks.clone()),
        &config,
    );
    let router = app(state, &config);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer { base_url, decks })
}
