//! HTTP server layer for picpix.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │  GET /picpix?img_url=&i=&cap=&width=&height=&keep_aspect_ratio= │
//! │                                                                 │
//! │  ┌───────────────────────────┐  ┌───────────────────────────┐   │
//! │  │         handlers          │  │          routes           │   │
//! │  │ (query parsing, errors)   │  │ (router, CORS, tracing)   │   │
//! │  └───────────────────────────┘  └───────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, picpix_handler, AppState, ErrorResponse, HealthResponse, PicpixQueryParams,
};
pub use routes::{create_router, RouterConfig};
