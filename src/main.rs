//! picpix - serves windows of packed ARGB pixels for remote images.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use picpix::{
    config::Config,
    fetch::{FetchCache, HttpImageSource},
    render::RenderService,
    server::{create_router, RouterConfig},
    window::WindowService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("picpix v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!(
        "  Cache: {} images, {} renders",
        config.fetch_cache_size, config.render_cache_size
    );
    info!("  Fetch timeout: {}s", config.fetch_timeout);
    info!("  Max dimension: {}", config.max_dimension);

    let source = match HttpImageSource::with_options(config.fetch_timeout(), &config.user_agent) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fetch_cache = Arc::new(FetchCache::with_capacity(source, config.fetch_cache_size));
    let renderer = RenderService::with_cache_capacity(fetch_cache, config.render_cache_size);
    let window_service = WindowService::new(renderer).with_max_dimension(config.max_dimension);

    let router = create_router(window_service, build_router_config(&config));

    let addr = config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!(
        "  Try: curl 'http://{}/picpix?img_url=<url>&i=0&cap=16&width=32&height=32'",
        addr
    );

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "picpix=debug,tower_http=debug"
    } else {
        "picpix=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
