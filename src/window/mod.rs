//! Window service layer.
//!
//! Validates window requests, resolves the rendered pixels and encodes the
//! requested slice as text.
//!
//! # Response Contract
//!
//! - Success: base-36 tokens (uppercase, no padding) joined by single spaces
//! - Fetch or decode failure: `!` followed by a readable message, delivered
//!   as a successful response
//! - Invalid parameters: a [`WindowError`](crate::error::WindowError), which
//!   the HTTP layer turns into a client error
//!
//! # Components
//!
//! - [`WindowService`]: entry point for window requests
//! - [`WindowRequest`]: raw request parameters
//! - [`WindowResponse`]: encoded pixels or an in-band fetch error
//! - [`to_base36`] / [`encode_window`]: text encoding

mod encoder;
mod service;

pub use encoder::{encode_window, to_base36, ERROR_PREFIX};
pub use service::{WindowRequest, WindowResponse, WindowService, DEFAULT_MAX_DIMENSION};
