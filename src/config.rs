//! Configuration management for picpix.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `PICPIX_` prefix
//! - Sensible defaults for all settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use picpix::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! println!("Fetch cache: {} images", config.fetch_cache_size);
//! ```
//!
//! # Environment Variables
//!
//! - `PICPIX_HOST` - Server bind address (default: 0.0.0.0)
//! - `PICPIX_PORT` - Server port (default: 8000)
//! - `PICPIX_FETCH_CACHE_SIZE` - Max decoded images to cache (default: 10)
//! - `PICPIX_RENDER_CACHE_SIZE` - Max rendered pixel sequences to cache (default: 10)
//! - `PICPIX_FETCH_TIMEOUT` - Image request timeout in seconds (default: 10)
//! - `PICPIX_USER_AGENT` - User agent for image requests
//! - `PICPIX_MAX_DIMENSION` - Largest accepted width or height (default: 4096)
//! - `PICPIX_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::time::Duration;

use clap::Parser;

use crate::fetch::{DEFAULT_FETCH_CACHE_CAPACITY, DEFAULT_FETCH_TIMEOUT, LEGACY_USER_AGENT};
use crate::render::DEFAULT_RENDER_CACHE_CAPACITY;
use crate::window::DEFAULT_MAX_DIMENSION;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// picpix - serves windows of packed ARGB pixels for remote images.
#[derive(Parser, Debug, Clone)]
#[command(name = "picpix")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "PICPIX_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PICPIX_PORT")]
    pub port: u16,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Maximum number of decoded source images to keep in memory.
    #[arg(long, default_value_t = DEFAULT_FETCH_CACHE_CAPACITY, env = "PICPIX_FETCH_CACHE_SIZE")]
    pub fetch_cache_size: usize,

    /// Maximum number of rendered pixel sequences to keep in memory.
    #[arg(long, default_value_t = DEFAULT_RENDER_CACHE_CAPACITY, env = "PICPIX_RENDER_CACHE_SIZE")]
    pub render_cache_size: usize,

    // =========================================================================
    // Fetch Configuration
    // =========================================================================
    /// Timeout in seconds for a single image request.
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs(), env = "PICPIX_FETCH_TIMEOUT")]
    pub fetch_timeout: u64,

    /// User-Agent header sent with image requests.
    #[arg(long, default_value = LEGACY_USER_AGENT, env = "PICPIX_USER_AGENT")]
    pub user_agent: String,

    // =========================================================================
    // Request Limits
    // =========================================================================
    /// Largest accepted width or height for a rendered image.
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION, env = "PICPIX_MAX_DIMENSION")]
    pub max_dimension: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "PICPIX_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_cache_size == 0 {
            return Err("fetch_cache_size must be greater than 0".to_string());
        }
        if self.render_cache_size == 0 {
            return Err("render_cache_size must be greater than 0".to_string());
        }

        if self.fetch_timeout == 0 {
            return Err("fetch_timeout must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        if self.max_dimension == 0 {
            return Err("max_dimension must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the image request timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

// =============================================================================
// Tests
// =============================================================================
