//! Router configuration for picpix.
//!
//! # Route Structure
//!
//! ```text
//! /health   - Health check
//! /picpix   - Pixel window endpoint
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use picpix::fetch::{FetchCache, HttpImageSource};
//! use picpix::render::RenderService;
//! use picpix::server::{create_router, RouterConfig};
//! use picpix::window::WindowService;
//!
//! let fetch_cache = Arc::new(FetchCache::new(HttpImageSource::new()?));
//! let window_service = WindowService::new(RenderService::new(fetch_cache));
//!
//! let router = create_router(window_service, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, picpix_handler, AppState};
use crate::fetch::ImageSource;
use crate::window::WindowService;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default CORS allows any origin and tracing is enabled.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Wires the health and pixel routes, CORS, and optional request tracing.
pub fn create_router<S>(window_service: WindowService<S>, config: RouterConfig) -> Router
where
    S: ImageSource + 'static,
{
    let app_state = AppState::new(window_service);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/picpix", get(picpix_handler::<S>))
        .with_state(app_state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        // No allowed origins leaves CORS headers off entirely
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
