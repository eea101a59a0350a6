//! The listing and lookup behaviour of `tests/pagination_traversal.rs`, run
//! against a real Postgres server.
//!
//! Ignored by default. Run with `DSN=postgres://... cargo test -- --ignored`.
//! Every test tags its rows with a fresh prefix so reruns against the same
//! database do not see each other's data.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use pessoas::api::{AppContext, DEFAULT_REQUEST_TIMEOUT};
use pessoas::cache::RecordCache;
use pessoas::http_server::{HttpServer, HttpServerConfig};
use pessoas::pagination::{ListQuery, PAGE_SIZE};
use pessoas::person::Person;
use pessoas::storage::{PersonStore, PostgresStore};

async fn connect() -> Option<PostgresStore> {
    let dsn = std::env::var("DSN").ok()?;
    Some(PostgresStore::connect(&dsn, 4).await.unwrap())
}

fn prefix() -> String {
    format!("pg{}", &Uuid::new_v4().simple().to_string()[..8])
}

fn router(store: PostgresStore) -> Router {
    let ctx = AppContext::new(Arc::new(store), RecordCache::in_memory(), DEFAULT_REQUEST_TIMEOUT);
    HttpServer::build_router(ctx, &HttpServerConfig::default())
}

async fn seed(router: &Router, prefix: &str, count: usize) {
    for i in 0..count {
        let body = json!({
            "nome": format!("{prefix} {i}"),
            "apelido": format!("{prefix}{i}"),
            "nascimento": "2000-02-29",
        });
        let request = Request::post("/pessoas")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

async fn fetch(router: &Router, uri: &str) -> Value {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn names(page: &Value) -> Vec<String> {
    page["resultados"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_postgres_forward_and_backward_walk() {
    let Some(store) = connect().await else {
        return;
    };
    let router = router(store);
    let prefix = prefix();
    seed(&router, &prefix, 12).await;

    let mut seen = Vec::new();
    let mut pages = Vec::new();
    let mut uri = format!("/pessoas?t={}", prefix.to_uppercase());
    loop {
        let page = fetch(&router, &uri).await;
        seen.extend(names(&page));
        let next = page.get("proxima").and_then(Value::as_str).map(str::to_string);
        pages.push(page);
        match next {
            Some(next) => uri = next,
            None => break,
        }
    }

    let expected: Vec<String> = (0..12).map(|i| format!("{prefix} {i}")).collect();
    assert_eq!(seen, expected);
    assert_eq!(pages.len(), 3);
    assert_eq!(names(&pages[0]).len(), PAGE_SIZE);

    let back = pages[2]["anterior"].as_str().unwrap();
    assert_eq!(names(&fetch(&router, back).await), names(&pages[1]));
}

#[tokio::test]
#[ignore]
async fn test_postgres_store_operations() {
    let Some(store) = connect().await else {
        return;
    };
    let prefix = prefix();
    let before = store.count().await.unwrap();

    let person = Person::new(
        Uuid::new_v4(),
        format!("{prefix} Grace"),
        format!("{prefix}g"),
        NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
        vec!["COBOL".to_string()],
    );
    let id = store.create(&person).await.unwrap();
    assert!(id > 0);
    assert!(store.create(&person).await.is_err());
    assert_eq!(store.count().await.unwrap(), before + 1);

    let fetched = store.get_by_uid(&person.uuid).await.unwrap();
    assert_eq!(fetched.seq_id, id);
    assert_eq!(fetched.birthdate, person.birthdate);
    assert_eq!(fetched.stack, person.stack);
    assert!(fetched.created_at_secs() > 0);

    assert!(store.get_by_uid(&Uuid::new_v4()).await.unwrap_err().is_not_found());

    let page = store
        .list(&ListQuery::compose(Some(&prefix), None))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);

    // Wildcards match literally
    let page = store
        .list(&ListQuery::compose(Some("%_%"), None))
        .await
        .unwrap();
    assert!(page.iter().all(|p| p.name.contains("%_%") || p.nickname.contains("%_%")));

    store.close().await;
}
