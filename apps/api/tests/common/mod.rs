//! Shared harness for the HTTP integration tests.
//!
//! The router is driven in-process with `oneshot`; the store is an
//! in-memory SQLite database behind a call-recording decorator.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use medstock_api::{router, AppState};
use medstock_core::query::{MedicationFilter, MedicationQuery};
use medstock_core::{Medication, MedicationDetail, MedicationDraft, MedicationId};
use medstock_db::{
    Database, DbConfig, DbError, DbResult, MedicationStore, SqliteMedicationStore,
};

// =============================================================================
// Recording Store
// =============================================================================

/// Forwards to SQLite and records the name of every store call in order.
pub struct CountingStore {
    inner: SqliteMedicationStore,
    calls: Mutex<Vec<&'static str>>,
}

impl CountingStore {
    pub fn new(inner: SqliteMedicationStore) -> Self {
        CountingStore {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().await.clone()
    }

    pub async fn reset(&self) {
        self.calls.lock().await.clear();
    }

    async fn record(&self, call: &'static str) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl MedicationStore for CountingStore {
    async fn count(&self, filter: &MedicationFilter) -> DbResult<u64> {
        self.record("count").await;
        self.inner.count(filter).await
    }

    async fn list(&self, query: &MedicationQuery) -> DbResult<Vec<Medication>> {
        self.record("list").await;
        self.inner.list(query).await
    }

    async fn get_detail(&self, id: MedicationId) -> DbResult<Option<MedicationDetail>> {
        self.record("get_detail").await;
        self.inner.get_detail(id).await
    }

    async fn insert(&self, drafts: &[MedicationDraft]) -> DbResult<Vec<Medication>> {
        self.record("insert").await;
        self.inner.insert(drafts).await
    }

    async fn update(
        &self,
        id: MedicationId,
        patch: &MedicationDraft,
    ) -> DbResult<Option<Medication>> {
        self.record("update").await;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: MedicationId) -> DbResult<()> {
        self.record("delete").await;
        self.inner.delete(id).await
    }

    async fn category_names(&self) -> DbResult<Vec<String>> {
        self.record("category_names").await;
        self.inner.category_names().await
    }

    async fn supplier_names(&self) -> DbResult<Vec<String>> {
        self.record("supplier_names").await;
        self.inner.supplier_names().await
    }

    async fn quantities(&self) -> DbResult<Vec<Value>> {
        self.record("quantities").await;
        self.inner.quantities().await
    }

    async fn health_check(&self) -> bool {
        self.record("health_check").await;
        self.inner.health_check().await
    }
}

// =============================================================================
// Failing Store
// =============================================================================

/// A store whose every operation fails.
pub struct FailingStore;

fn unavailable<T>() -> DbResult<T> {
    Err(DbError::QueryFailed("store unavailable".to_string()))
}

#[async_trait]
impl MedicationStore for FailingStore {
    async fn count(&self, _filter: &MedicationFilter) -> DbResult<u64> {
        unavailable()
    }

    async fn list(&self, _query: &MedicationQuery) -> DbResult<Vec<Medication>> {
        unavailable()
    }

    async fn get_detail(&self, _id: MedicationId) -> DbResult<Option<MedicationDetail>> {
        unavailable()
    }

    async fn insert(&self, _drafts: &[MedicationDraft]) -> DbResult<Vec<Medication>> {
        unavailable()
    }

    async fn update(
        &self,
        _id: MedicationId,
        _patch: &MedicationDraft,
    ) -> DbResult<Option<Medication>> {
        unavailable()
    }

    async fn delete(&self, _id: MedicationId) -> DbResult<()> {
        unavailable()
    }

    async fn category_names(&self) -> DbResult<Vec<String>> {
        unavailable()
    }

    async fn supplier_names(&self) -> DbResult<Vec<String>> {
        unavailable()
    }

    async fn quantities(&self) -> DbResult<Vec<Value>> {
        unavailable()
    }

    async fn health_check(&self) -> bool {
        false
    }
}

// =============================================================================
// Test App
// =============================================================================

/// Reference rows created by [`TestApp::spawn`].
#[derive(Debug, Clone, Copy)]
pub struct Refs {
    pub analgesics: i64,
    pub antibiotics: i64,
    pub acme: i64,
    pub medisupply: i64,
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<CountingStore>,
    pub db: Database,
    pub refs: Refs,
}

impl TestApp {
    /// Fresh in-memory database with two categories and two suppliers.
    pub async fn spawn() -> TestApp {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let analgesics = db.categories().insert("Analgesics").await.unwrap().id;
        let antibiotics = db.categories().insert("Antibiotics").await.unwrap().id;
        let acme = db
            .suppliers()
            .insert("Acme Pharma", Some("orders@acme.test"), None)
            .await
            .unwrap()
            .id;
        let medisupply = db
            .suppliers()
            .insert("MediSupply", None, Some("+1-555-0100"))
            .await
            .unwrap()
            .id;

        let store = Arc::new(CountingStore::new(db.medications()));
        let router = router(AppState::new(store.clone()));

        TestApp {
            router,
            store,
            db,
            refs: Refs {
                analgesics,
                antibiotics,
                acme,
                medisupply,
            },
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        send(&self.router, Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, Method::PUT, uri, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, Method::DELETE, uri, None).await
    }

    /// Creates one medication through the API and returns its id.
    pub async fn create(&self, body: Value) -> i64 {
        let (status, created) = self.post("/medications", body).await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);
        created["id"].as_i64().unwrap()
    }

    /// Row count straight from the pool, bypassing the recorder.
    pub async fn row_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM medications")
            .fetch_one(self.db.pool())
            .await
            .unwrap()
    }
}

/// Router over a store that fails every call.
pub fn failing_router() -> Router {
    router(AppState::new(Arc::new(FailingStore)))
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
