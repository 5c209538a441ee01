//! HTTP fetch integration tests.
//!
//! These tests run a local image server on an ephemeral port and verify:
//! - Successful downloads and request headers
//! - Classification of HTTP, timeout and connection failures
//! - End-to-end windows served from a real HTTP source

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get as get_route;
use axum::Router;
use tower::ServiceExt;

use picpix::error::FetchErrorKind;
use picpix::fetch::{FetchCache, HttpImageSource, ImageSource, LEGACY_USER_AGENT};
use picpix::render::RenderService;
use picpix::window::WindowService;
use picpix::{create_router, RouterConfig};

use super::test_utils::{body_text, get, picpix_uri, png_bytes, solid, RED, RED_TOKEN};

/// Start a local image server and return its address.
async fn spawn_image_server() -> SocketAddr {
    let red = png_bytes(solid(2, 2, RED));
    let slow = red.clone();

    let app = Router::new()
        .route(
            "/red.png",
            get_route(move || {
                let red = red.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], red) }
            }),
        )
        .route(
            "/missing.png",
            get_route(|| async { (StatusCode::NOT_FOUND, "not found") }),
        )
        .route(
            "/page.html",
            get_route(|| async { "<html><body>hello</body></html>" }),
        )
        .route(
            "/slow.png",
            get_route(move || {
                let slow = slow.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    slow
                }
            }),
        )
        .route(
            "/headers",
            get_route(|headers: HeaderMap| async move {
                let agent = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                format!("{}\n{}", agent, content_type)
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// =============================================================================
// HttpImageSource
// =============================================================================

#[tokio::test]
async fn test_fetch_success() {
    let addr = spawn_image_server().await;
    let source = HttpImageSource::new().unwrap();

    let bytes = source
        .fetch_bytes(&format!("http://{}/red.png", addr))
        .await
        .unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.width(), 2);
    assert_eq!(decoded.height(), 2);
}

#[tokio::test]
async fn test_fetch_sends_configured_headers() {
    let addr = spawn_image_server().await;
    let source = HttpImageSource::new().unwrap();

    let bytes = source
        .fetch_bytes(&format!("http://{}/headers", addr))
        .await
        .unwrap();

    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text, format!("{}\nimage/*", LEGACY_USER_AGENT));
}

#[tokio::test]
async fn test_fetch_custom_user_agent() {
    let addr = spawn_image_server().await;
    let source = HttpImageSource::with_options(Duration::from_secs(5), "picpix-test/1.0").unwrap();

    let bytes = source
        .fetch_bytes(&format!("http://{}/headers", addr))
        .await
        .unwrap();

    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("picpix-test/1.0\n"));
}

#[tokio::test]
async fn test_fetch_http_status_error() {
    let addr = spawn_image_server().await;
    let source = HttpImageSource::new().unwrap();

    let err = source
        .fetch_bytes(&format!("http://{}/missing.png", addr))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::HttpStatusError);
    let message = err.to_string();
    assert!(message.starts_with("HTTP error while requesting image url: "));
    assert!(message.contains("404"));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let addr = spawn_image_server().await;
    let source = HttpImageSource::with_options(Duration::from_millis(200), LEGACY_USER_AGENT)
        .unwrap();

    let err = source
        .fetch_bytes(&format!("http://{}/slow.png", addr))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::Timeout);
    assert_eq!(err.to_string(), "Timeout while requesting image url");
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let source = HttpImageSource::new().unwrap();

    let err = source
        .fetch_bytes("http://127.0.0.1:1/red.png")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::ConnectionError);
    assert_eq!(
        err.to_string(),
        "Connection error while requesting image url"
    );
}

// =============================================================================
// FetchCache over HTTP
// =============================================================================

#[tokio::test]
async fn test_fetch_cache_rejects_non_image() {
    let addr = spawn_image_server().await;
    let cache = FetchCache::new(HttpImageSource::new().unwrap());
    let url = format!("http://{}/page.html", addr);

    let err = cache.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::DecodeError);
    assert!(!cache.contains(&url).await);
}

#[tokio::test]
async fn test_fetch_cache_decodes_image() {
    let addr = spawn_image_server().await;
    let cache = FetchCache::new(HttpImageSource::new().unwrap());
    let url = format!("http://{}/red.png", addr);

    let image = cache.fetch(&url).await.unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
    assert!(cache.contains(&url).await);
}

// =============================================================================
// End to End
// =============================================================================

#[tokio::test]
async fn test_window_from_http_source() {
    let addr = spawn_image_server().await;
    let fetch_cache = Arc::new(FetchCache::new(HttpImageSource::new().unwrap()));
    let window_service = WindowService::new(RenderService::new(fetch_cache));
    let app = create_router(window_service, RouterConfig::new().with_tracing(false));

    let uri = picpix_uri(&format!("http://{}/red.png", addr), 0, 4, 2, 2);
    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, [RED_TOKEN; 4].join(" "));

    let uri = picpix_uri(&format!("http://{}/missing.png", addr), 0, 4, 2, 2);
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .starts_with("!HTTP error while requesting image url: "));
}
