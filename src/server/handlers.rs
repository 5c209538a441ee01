//! HTTP request handlers for the picpix API.
//!
//! # Endpoints
//!
//! - `GET /picpix` - Serve a window of packed pixels
//! - `GET /health` - Health check endpoint

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::WindowError;
use crate::fetch::ImageSource;
use crate::window::{WindowRequest, WindowResponse, WindowService};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the window service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: ImageSource> {
    /// The window service for processing pixel requests
    pub window_service: Arc<WindowService<S>>,
}

impl<S: ImageSource> AppState<S> {
    /// Create a new application state with the given window service.
    pub fn new(window_service: WindowService<S>) -> Self {
        Self {
            window_service: Arc::new(window_service),
        }
    }
}

impl<S: ImageSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            window_service: Arc::clone(&self.window_service),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for pixel window requests.
#[derive(Debug, Deserialize)]
pub struct PicpixQueryParams {
    /// Source image URL
    pub img_url: String,

    /// Inclusive start index into the packed sequence
    pub i: i64,

    /// Maximum number of values to return
    pub cap: i64,

    /// Target width in pixels
    pub width: i64,

    /// Target height in pixels
    pub height: i64,

    /// Letterbox instead of stretching (default: false)
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub keep_aspect_ratio: bool,
}

impl PicpixQueryParams {
    /// Convert into a window service request.
    pub fn into_request(self) -> WindowRequest {
        WindowRequest::new(self.img_url, self.i, self.cap, self.width, self.height)
            .with_keep_aspect_ratio(self.keep_aspect_ratio)
    }
}

/// Parse a loosely formatted boolean flag.
fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off` (any case).
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean flag")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
            match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(Unexpected::Unsigned(value), &self)),
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            parse_flag(value).ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for parameter validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_start")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert WindowError to HTTP response.
///
/// Every validation failure is a 400 logged at WARN level.
impl IntoResponse for WindowError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let error_type = self.error_type();
        let message = self.to_string();

        warn!(
            error_type = error_type,
            status = status.as_u16(),
            "Client error: {}",
            message
        );

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle pixel window requests.
///
/// # Endpoint
///
/// `GET /picpix`
///
/// # Query Parameters
///
/// - `img_url`: Source image URL
/// - `i`: Inclusive start index into the packed sequence
/// - `cap`: Maximum number of values to return
/// - `width`, `height`: Target size in pixels
/// - `keep_aspect_ratio`: Letterbox instead of stretching (default: false)
///
/// # Response
///
/// - `200 OK`: Space-separated base-36 pixel values, or a `!`-prefixed
///   message when the image could not be fetched or decoded
/// - `400 Bad Request`: Invalid or missing parameters
///
/// # Headers
///
/// - `Content-Type: text/plain; charset=utf-8`
/// - `X-Render-Cache-Hit: true|false` (pixel responses only)
/// - `X-Pixel-Count: <n>` (pixel responses only)
pub async fn picpix_handler<S: ImageSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<PicpixQueryParams>,
) -> Result<Response, WindowError> {
    let request = query.into_request();

    let response = state.window_service.serve(&request).await?;

    let http_response = match response {
        WindowResponse::Pixels {
            body,
            count,
            cache_hit,
        } => {
            debug!(url = %request.url, count, cache_hit, "served pixel window");
            (
                [
                    (header::CONTENT_TYPE, TEXT_PLAIN.to_string()),
                    (
                        header::HeaderName::from_static("x-render-cache-hit"),
                        cache_hit.to_string(),
                    ),
                    (
                        header::HeaderName::from_static("x-pixel-count"),
                        count.to_string(),
                    ),
                ],
                body,
            )
                .into_response()
        }
        WindowResponse::FetchFailed(err) => {
            warn!(
                url = %request.url,
                kind = ?err.kind(),
                "Image fetch failed: {}",
                err
            );
            let body = WindowResponse::FetchFailed(err).into_body();
            ([(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
        }
    };

    Ok(http_response)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
