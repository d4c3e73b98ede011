//! Storage API tests driving the axum router in-process.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use navtiles::db::services::{BlobStore, MemoryBlobStore, SeaOrmBlobStore, StoreError, ensure_schema};
use navtiles::models::default_tiles;
use navtiles::web::create_axum_router;
use sea_orm::{ConnectOptions, Database, DbErr};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("origin", "http://localhost:5173");
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Response { status, headers, body }
}

fn memory_app() -> (Router, Arc<MemoryBlobStore>) {
    let store = Arc::new(MemoryBlobStore::new());
    (create_axum_router(store.clone()), store)
}

fn tile_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "url": format!("https://{id}.test"), "color": "#123456" })
}

fn ids(body: &Value) -> Vec<String> {
    body["tiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_get_on_empty_store_returns_defaults() {
    let (app, _store) = memory_app();
    let res = send(&app, Method::GET, "/api/tiles", None).await;

    assert_eq!(res.status, StatusCode::OK);
    let tiles: Vec<navtiles::models::Tile> = serde_json::from_value(res.body["tiles"].clone()).unwrap();
    assert_eq!(tiles, default_tiles());
}

#[tokio::test]
async fn test_put_replaces_collection() {
    let (app, _store) = memory_app();
    let res = send(
        &app,
        Method::PUT,
        "/api/tiles",
        Some(json!({ "tiles": [tile_json("a", "A"), tile_json("b", "B")] })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(ids(&res.body), vec!["a", "b"]);

    let res = send(&app, Method::GET, "/api/tiles", None).await;
    assert_eq!(ids(&res.body), vec!["a", "b"]);
}

#[tokio::test]
async fn test_put_with_non_array_is_rejected_and_store_untouched() {
    let (app, _store) = memory_app();
    send(&app, Method::PUT, "/api/tiles", Some(json!({ "tiles": [tile_json("a", "A")] }))).await;

    for bad in [json!({ "tiles": "nope" }), json!({ "tiles": { "id": "x" } }), json!({})] {
        let res = send(&app, Method::PUT, "/api/tiles", Some(bad)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["error"], "Invalid tiles format");
    }

    let res = send(&app, Method::GET, "/api/tiles", None).await;
    assert_eq!(ids(&res.body), vec!["a"]);
}

#[tokio::test]
async fn test_put_with_malformed_json_is_rejected() {
    let (app, _store) = memory_app();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/tiles")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upsert_appends_then_replaces() {
    let (app, _store) = memory_app();

    // Empty store: the defaults are the base of the first write.
    let body = json!({ "name": "Docs", "url": "https://docs.rs", "color": "#DEA584" });
    let res = send(&app, Method::POST, "/api/tiles/docs", Some(body)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.body), vec!["1", "2", "3", "4", "docs"]);

    // The path id wins over the body id.
    let body = json!({ "id": "ignored", "name": "Gmail", "url": "https://mail.google.com", "color": "#EA4335" });
    let res = send(&app, Method::POST, "/api/tiles/1", Some(body)).await;
    assert_eq!(ids(&res.body), vec!["1", "2", "3", "4", "docs"]);
    assert_eq!(res.body["tiles"][0]["name"], "Gmail");

    let res = send(&app, Method::POST, "/api/tiles/x", Some(json!({ "name": "no url" }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_tile() {
    let (app, _store) = memory_app();
    send(&app, Method::PUT, "/api/tiles", Some(json!({ "tiles": [tile_json("a", "A"), tile_json("b", "B")] }))).await;

    let res = send(&app, Method::DELETE, "/api/tiles/a", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.body), vec!["b"]);
}

#[tokio::test]
async fn test_delete_absent_id_is_404_and_store_untouched() {
    let (app, store) = memory_app();
    send(&app, Method::PUT, "/api/tiles", Some(json!({ "tiles": [tile_json("a", "A")] }))).await;

    let res = send(&app, Method::DELETE, "/api/tiles/missing", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "Tile not found");

    let stored = store.get("tiles").await.unwrap().unwrap();
    assert_eq!(stored, json!([tile_json("a", "A")]));
}

#[tokio::test]
async fn test_delete_on_empty_store_does_not_write() {
    let (app, store) = memory_app();
    let res = send(&app, Method::DELETE, "/api/tiles/missing", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(store.get("tiles").await.unwrap().is_none());
}

#[tokio::test]
async fn test_tile_ids_may_contain_slashes() {
    let (app, _store) = memory_app();
    send(&app, Method::PUT, "/api/tiles", Some(json!({ "tiles": [tile_json("a", "A")] }))).await;

    let body = json!({ "name": "Nested", "url": "https://nested.test", "color": "#00AA00" });
    let res = send(&app, Method::POST, "/api/tiles/work/docs", Some(body)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.body), vec!["a", "work/docs"]);

    let res = send(&app, Method::DELETE, "/api/tiles/work/docs", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(&res.body), vec!["a"]);
}

#[tokio::test]
async fn test_color_meanings_round_trip_with_uppercase_keys() {
    let (app, _store) = memory_app();

    let res = send(&app, Method::GET, "/api/color-meanings", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["colorMeanings"], json!({}));

    let meanings = json!({ "colorMeanings": { "#be002f": { "name": "News", "emoji": "📰" } } });
    let res = send(&app, Method::PUT, "/api/color-meanings", Some(meanings)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);

    let res = send(&app, Method::GET, "/api/color-meanings", None).await;
    assert_eq!(res.body["colorMeanings"]["#BE002F"]["name"], "News");

    let res = send(&app, Method::PUT, "/api/color-meanings", Some(json!({ "colorMeanings": [] }))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_migrate_copies_legacy_tiles_once() {
    let (app, store) = memory_app();

    let res = send(&app, Method::POST, "/api/migrate", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let legacy = json!([tile_json("k1", "Old"), tile_json("k2", "Older")]).to_string();
    store.insert_legacy("tiles", legacy).await;

    let res = send(&app, Method::POST, "/api/migrate", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["migratedTiles"], 2);

    let res = send(&app, Method::GET, "/api/tiles", None).await;
    assert_eq!(ids(&res.body), vec!["k1", "k2"]);

    let res = send(&app, Method::POST, "/api/migrate", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["migratedTiles"], 0);
}

#[tokio::test]
async fn test_migrate_with_corrupt_legacy_data_is_500_with_details() {
    let (app, store) = memory_app();
    store.insert_legacy("tiles", "{broken").await;

    let res = send(&app, Method::POST, "/api/migrate", None).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "Migration failed");
    assert!(res.body["details"].as_str().is_some());
}

#[tokio::test]
async fn test_cors_options_and_unknown_paths() {
    let (app, _store) = memory_app();

    let res = send(&app, Method::GET, "/api/tiles", None).await;
    assert_eq!(res.headers["access-control-allow-origin"], "*");

    let res = send(&app, Method::OPTIONS, "/api/tiles", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, Value::Null);

    let res = send(&app, Method::OPTIONS, "/anything/else", None).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = send(&app, Method::GET, "/api/unknown", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.headers["access-control-allow-origin"], "*");

    let res = send(&app, Method::GET, "/api/migrate", None).await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
}

struct BrokenStore;

#[async_trait]
impl BlobStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Database(DbErr::Custom("connection refused".to_string())))
    }

    async fn put(&self, _key: &str, _value: &Value) -> Result<(), StoreError> {
        Err(StoreError::Database(DbErr::Custom("connection refused".to_string())))
    }

    async fn get_legacy(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Database(DbErr::Custom("connection refused".to_string())))
    }
}

#[tokio::test]
async fn test_datastore_errors_are_500() {
    let app = create_axum_router(Arc::new(BrokenStore));
    let res = send(&app, Method::GET, "/api/tiles", None).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.body["error"].as_str().unwrap().starts_with("Database error"));

    let res = send(&app, Method::PUT, "/api/tiles", Some(json!({ "tiles": [] }))).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);

    let res = send(&app, Method::DELETE, "/api/tiles/1", None).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_router_over_sqlite() {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    ensure_schema(&db).await.unwrap();
    let app = create_axum_router(Arc::new(SeaOrmBlobStore::new(db)));

    send(&app, Method::PUT, "/api/tiles", Some(json!({ "tiles": [tile_json("a", "A")] }))).await;
    let res = send(&app, Method::POST, "/api/tiles/b", Some(tile_json("b", "B"))).await;
    assert_eq!(ids(&res.body), vec!["a", "b"]);

    let res = send(&app, Method::GET, "/api/tiles", None).await;
    assert_eq!(ids(&res.body), vec!["a", "b"]);
}
