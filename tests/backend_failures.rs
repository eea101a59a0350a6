//! Request outcomes when the cache or the store misbehaves.
//!
//! The stand-in backends here fail or stall on demand; the real SQLite store
//! sits underneath so successful calls behave normally.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use pessoas::api::{AppContext, DEFAULT_REQUEST_TIMEOUT};
use pessoas::cache::{CacheBackend, CacheError, CacheResult, MemoryCache, RecordCache};
use pessoas::http_server::{HttpServer, HttpServerConfig};
use pessoas::pagination::ListQuery;
use pessoas::person::Person;
use pessoas::storage::{PersonStore, SqliteStore, StorageResult};

/// Memory cache whose reads and writes can be made to fail.
#[derive(Default)]
struct FaultyCache {
    inner: MemoryCache,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
}

#[async_trait]
impl CacheBackend for FaultyCache {
    fn backend_name(&self) -> &'static str {
        "faulty"
    }

    async fn set(&self, key: &str, value: String) -> CacheResult<()> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(CacheError::Poisoned);
        }
        self.inner.set(key, value).await
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(CacheError::Poisoned);
        }
        self.inner.get(key).await
    }
}

/// SQLite store that sleeps before every call.
struct SlowStore {
    inner: SqliteStore,
    delay: Duration,
}

#[async_trait]
impl PersonStore for SlowStore {
    fn backend_name(&self) -> &'static str {
        "slow"
    }

    async fn create(&self, person: &Person) -> StorageResult<i64> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(person).await
    }

    async fn get_by_uid(&self, uid: &Uuid) -> StorageResult<Person> {
        tokio::time::sleep(self.delay).await;
        self.inner.get_by_uid(uid).await
    }

    async fn list(&self, query: &ListQuery) -> StorageResult<Vec<Person>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list(query).await
    }

    async fn count(&self) -> StorageResult<i64> {
        tokio::time::sleep(self.delay).await;
        self.inner.count().await
    }
}

fn router(store: Arc<dyn PersonStore>, cache: Arc<dyn CacheBackend>, timeout: Duration) -> Router {
    let ctx = AppContext::new(store, RecordCache::new(cache), timeout);
    HttpServer::build_router(ctx, &HttpServerConfig::default())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn create_request() -> Request<Body> {
    let body = json!({
        "apelido": "johndoe",
        "nome": "John Doe",
        "nascimento": "1990-01-01",
    });
    Request::post("/pessoas")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn stored_person() -> Person {
    Person::new(
        Uuid::new_v4(),
        "Ada Lovelace",
        "ada",
        NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
        vec![],
    )
}

#[tokio::test]
async fn test_create_fails_when_cache_write_fails() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let cache = Arc::new(FaultyCache::default());
    cache.fail_set.store(true, Ordering::SeqCst);
    let router = router(store, cache, DEFAULT_REQUEST_TIMEOUT);

    let (status, body) = send(&router, create_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert!(body["error"].as_str().unwrap().starts_with("Cache failure"));
}

#[tokio::test]
async fn test_lookup_fails_when_cache_read_fails() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let person = stored_person();
    store.create(&person).await.unwrap();

    let cache = Arc::new(FaultyCache::default());
    cache.fail_get.store(true, Ordering::SeqCst);
    let router = router(store, cache, DEFAULT_REQUEST_TIMEOUT);

    let uri = format!("/pessoas/{}", person.uuid);
    let (status, body) = send(&router, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
}

#[tokio::test]
async fn test_lookup_still_answers_when_repopulate_fails() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let person = stored_person();
    store.create(&person).await.unwrap();

    let cache = Arc::new(FaultyCache::default());
    cache.fail_set.store(true, Ordering::SeqCst);
    let router = router(store, cache.clone(), DEFAULT_REQUEST_TIMEOUT);

    let uri = format!("/pessoas/{}", person.uuid);
    let (status, body) = send(&router, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uuid"], person.uuid.to_string());
    assert_eq!(body["apelido"], "ada");
    assert!(cache.inner.is_empty().unwrap());
}

#[tokio::test]
async fn test_slow_store_hits_request_deadline() {
    let store = Arc::new(SlowStore {
        inner: SqliteStore::in_memory().unwrap(),
        delay: Duration::from_millis(500),
    });
    let router = router(store, Arc::new(MemoryCache::new()), Duration::from_millis(20));

    let (status, body) = send(
        &router,
        Request::get("/contagem-pessoas").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert_eq!(body["error"], "Deadline exceeded waiting for storage");

    let (status, _) = send(&router, create_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(
        &router,
        Request::get("/pessoas?t=john").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
