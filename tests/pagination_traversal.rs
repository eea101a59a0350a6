//! Walks result sets page by page through the links the service hands out.

use std::collections::HashSet;
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
use pessoas::storage::{PersonStore, SqliteStore};

fn router() -> Router {
    let store = SqliteStore::in_memory().unwrap();
    let ctx = AppContext::new(
        Arc::new(store),
        RecordCache::in_memory(),
        DEFAULT_REQUEST_TIMEOUT,
    );
    HttpServer::build_router(ctx, &HttpServerConfig::default())
}

async fn seed(router: &Router, prefix: &str, count: usize) {
    for i in 0..count {
        let body = json!({
            "nome": format!("{prefix} {i}"),
            "apelido": format!("{}{i}", prefix.to_lowercase()),
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

fn uuids(page: &Value) -> Vec<String> {
    page["resultados"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["uuid"].as_str().unwrap().to_string())
        .collect()
}

fn link<'a>(page: &'a Value, name: &str) -> Option<&'a str> {
    page.get(name).and_then(Value::as_str)
}

#[tokio::test]
async fn test_six_records_make_two_pages() {
    let router = router();
    seed(&router, "Dev", 6).await;

    let first = fetch(&router, "/pessoas?t=dev").await;
    assert_eq!(uuids(&first).len(), PAGE_SIZE);
    assert!(link(&first, "anterior").is_none());
    let next = link(&first, "proxima").unwrap().to_string();

    let second = fetch(&router, &next).await;
    assert_eq!(uuids(&second).len(), 1);
    assert_eq!(second["resultados"][0]["name"], "Dev 5");
    assert!(link(&second, "proxima").is_none());
    assert_eq!(link(&second, "anterior"), Some("/pessoas?t=dev"));
}

#[tokio::test]
async fn test_forward_walk_visits_every_match_once_in_order() {
    let router = router();
    seed(&router, "Rustacean", 12).await;
    seed(&router, "Gopher", 4).await;

    let mut seen = Vec::new();
    let mut uri = "/pessoas?t=rustacean".to_string();
    let mut pages = 0;
    loop {
        let page = fetch(&router, &uri).await;
        pages += 1;
        for person in page["resultados"].as_array().unwrap() {
            seen.push(person["name"].as_str().unwrap().to_string());
        }
        match link(&page, "proxima") {
            Some(next) => uri = next.to_string(),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    let expected: Vec<String> = (0..12).map(|i| format!("Rustacean {i}")).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_backward_links_retrace_the_walk() {
    let router = router();
    seed(&router, "Dev", 12).await;

    let first = fetch(&router, "/pessoas?t=dev").await;
    let second = fetch(&router, link(&first, "proxima").unwrap()).await;
    let third = fetch(&router, link(&second, "proxima").unwrap()).await;
    assert_eq!(uuids(&third).len(), 2);

    let back_to_second = fetch(&router, link(&third, "anterior").unwrap()).await;
    assert_eq!(uuids(&back_to_second), uuids(&second));
    assert_eq!(link(&back_to_second, "proxima"), link(&second, "proxima"));

    let back_to_first = fetch(&router, link(&back_to_second, "anterior").unwrap()).await;
    assert_eq!(uuids(&back_to_first), uuids(&first));
    assert!(link(&back_to_first, "anterior").is_none());
}

#[tokio::test]
async fn test_exactly_full_last_page_leads_to_empty_page() {
    let router = router();
    seed(&router, "Dev", 10).await;

    let first = fetch(&router, "/pessoas?t=dev").await;
    let second = fetch(&router, link(&first, "proxima").unwrap()).await;
    assert_eq!(uuids(&second).len(), PAGE_SIZE);

    let third = fetch(&router, link(&second, "proxima").unwrap()).await;
    assert!(uuids(&third).is_empty());
    assert!(link(&third, "proxima").is_none());
    assert!(link(&third, "anterior").is_some());
}

#[tokio::test]
async fn test_garbage_cursor_restarts_from_first_page() {
    let router = router();
    seed(&router, "Dev", 3).await;

    let page = fetch(&router, "/pessoas?t=dev&pagina=garbage").await;
    assert_eq!(uuids(&page).len(), 3);
}

#[tokio::test]
async fn test_file_backed_store_keeps_records_across_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("people.db");

    let uuid = Uuid::new_v4();
    {
        let store = SqliteStore::open(&path).unwrap();
        let person = Person::new(
            uuid,
            "Grace Hopper".to_string(),
            "grace".to_string(),
            NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
            vec!["COBOL".to_string()],
        );
        let id = store.create(&person).await.unwrap();
        assert!(id > 0);
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count().await.unwrap(), 1);

    let person = store.get_by_uid(&uuid).await.unwrap();
    assert_eq!(person.nickname, "grace");
    assert_eq!(person.stack, vec!["COBOL".to_string()]);

    let page = store
        .list(&ListQuery::compose(Some("hopper"), None))
        .await
        .unwrap();
    let unique: HashSet<_> = page.iter().map(|p| p.uuid).collect();
    assert_eq!(unique.len(), 1);
}
