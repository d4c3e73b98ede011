//! End-to-end tests: the real router on a random port, driven through the
//! reqwest-backed dashboard client.

use async_trait::async_trait;
use navtiles::dashboard::app::TileDraft;
use navtiles::dashboard::client::{DashboardApi, HttpDashboardApi};
use navtiles::dashboard::favicon::FaviconProbe;
use navtiles::dashboard::store::LocalMirror;
use navtiles::dashboard::{Dashboard, DashboardError};
use navtiles::db::services::MemoryBlobStore;
use navtiles::models::{ColorMeaning, default_tiles};
use navtiles::web::create_axum_router;
use std::sync::Arc;

struct TestServer {
    base_url: String,
    tmp: tempfile::TempDir,
}

impl TestServer {
    fn api(&self) -> HttpDashboardApi {
        HttpDashboardApi::new(reqwest::Client::new(), self.base_url.clone())
    }

    fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            Arc::new(self.api()),
            LocalMirror::new(self.tmp.path()),
            Arc::new(NoFavicons),
        )
    }
}

struct NoFavicons;

#[async_trait]
impl FaviconProbe for NoFavicons {
    async fn probe(&self, _url: &str) -> bool {
        false
    }
}

async fn start_test_server() -> TestServer {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let app = create_axum_router(Arc::new(MemoryBlobStore::new()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}/api"),
        tmp,
    }
}

#[tokio::test]
async fn test_client_loads_defaults_and_saves() {
    let server = start_test_server().await;
    let api = server.api();

    assert_eq!(api.load_tiles().await.unwrap(), default_tiles());

    let mut tiles = default_tiles();
    tiles.reverse();
    let saved = api.save_tiles(&tiles).await.unwrap();
    assert_eq!(saved, tiles);
    assert_eq!(api.load_tiles().await.unwrap(), tiles);
}

#[tokio::test]
async fn test_dashboard_session() {
    let server = start_test_server().await;
    let mut dash = server.dashboard();
    dash.load().await.unwrap();
    assert_eq!(dash.tiles().len(), 4);

    dash.open_add();
    let id = dash
        .submit_tile_modal(&TileDraft {
            name: "知乎".to_string(),
            url: "https://www.zhihu.com".to_string(),
            color: "#0066ff".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    dash.set_search("zhihu");
    let visible: Vec<String> = dash.visible_tiles().iter().map(|t| t.id.clone()).collect();
    assert_eq!(visible, vec![id.clone()]);
    dash.set_search("");

    assert!(dash.drag_end(&id, Some("1")).await.unwrap());
    assert!(dash.delete_tile("2", true).await.unwrap());

    // A fresh session sees what the first one persisted.
    let mut other = server.dashboard();
    other.load().await.unwrap();
    let order: Vec<&str> = other.tiles().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(order, vec![id.as_str(), "1", "3", "4"]);
    assert_eq!(other.tiles()[0].color, "#0066FF");
}

#[tokio::test]
async fn test_color_meanings_and_backup() {
    let server = start_test_server().await;
    let mut dash = server.dashboard();
    dash.load().await.unwrap();

    dash.set_color_meaning(
        "#10a37f",
        ColorMeaning {
            name: "AI".to_string(),
            emoji: "🤖".to_string(),
            description: Some("Assistants".to_string()),
        },
    )
    .await
    .unwrap();

    let (_, backup) = dash.export().unwrap();

    let mut other = server.dashboard();
    other.load().await.unwrap();
    assert_eq!(other.color_meanings().label("#10A37F"), "🤖 AI");

    other.remove_color_meaning("#10A37F").await.unwrap();
    other.import(&backup).await.unwrap();
    assert_eq!(other.color_meanings().len(), 1);
    assert_eq!(other.tiles(), dash.tiles());
}

#[tokio::test]
async fn test_delete_absent_over_http_is_404_with_cors() {
    let server = start_test_server().await;
    let response = reqwest::Client::new()
        .delete(format!("{}/tiles/nope", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_unreachable_server_keeps_session_alive() {
    let server = start_test_server().await;
    let mut dash = Dashboard::new(
        Arc::new(HttpDashboardApi::new(reqwest::Client::new(), "http://127.0.0.1:9/api")),
        LocalMirror::new(server.tmp.path()),
        Arc::new(NoFavicons),
    );
    assert!(matches!(dash.load().await, Err(DashboardError::Load(_))));
    assert!(dash.banner().is_some());
    dash.dismiss_banner();
    assert!(dash.banner().is_none());
}
