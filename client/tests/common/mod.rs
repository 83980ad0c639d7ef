#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use newsdesk_client::{
    navigator::HistoryNavigator,
    notify::{Notifier, RecordingNotifier},
    session::TOKEN_KEY,
    storage::{DurableStorage, MemoryStorage},
    ApiClient, ClientConfig, Session,
};
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub session: Session,
    pub navigator: Arc<HistoryNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub api: ApiClient,
}

impl Harness {
    pub fn notifier(&self) -> Option<Arc<dyn Notifier>> {
        Some(self.notifier.clone())
    }
}

/// Mock server plus a client wired to it, starting at `/`.
pub async fn harness() -> Harness {
    harness_with_token(None).await
}

/// Same as [`harness`], with `token` already persisted before the session loads.
pub async fn harness_with_token(token: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    if let Some(token) = token {
        storage.set(TOKEN_KEY, token).expect("seed token");
    }
    let session = Session::restore(storage.clone());
    let navigator = Arc::new(HistoryNavigator::default());
    let config = ClientConfig::default().with_base_url(server.uri());
    let api = ApiClient::new(config, session.clone(), navigator.clone()).expect("build client");
    Harness {
        server,
        storage,
        session,
        navigator,
        notifier: Arc::new(RecordingNotifier::new()),
        api,
    }
}

/// Flat (current schema) article body.
pub fn article(document_id: &str, title: &str) -> Value {
    json!({
        "id": 1,
        "documentId": document_id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "excerpt": "An excerpt",
        "content": "Body text",
        "publishedAt": null,
        "isFeatured": false,
        "views": 0,
        "tags": []
    })
}

/// Wrapped (older schema) article body.
pub fn wrapped_article(id: i64, title: &str, featured: bool) -> Value {
    json!({
        "id": id,
        "attributes": {
            "title": title,
            "slug": title.to_lowercase().replace(' ', "-"),
            "isFeatured": featured,
            "publishedAt": "2024-01-01T00:00:00.000Z",
            "category": { "data": { "id": 3, "attributes": { "name": "News", "slug": "news" } } }
        }
    })
}

pub fn user(username: &str, role: Value) -> Value {
    json!({
        "id": 9,
        "username": username,
        "email": format!("{username}@example.com"),
        "role": role
    })
}
