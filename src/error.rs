use thiserror::Error;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Timeout,
    ConnectionError,
    HttpStatusError,
    UnknownNetworkError,
    DecodeError,
}

/// Errors that can occur while fetching and decoding a remote image.
///
/// These are reported in-band to clients (as `!`-prefixed text), so the
/// display strings are part of the response contract.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request did not complete within the fetch timeout
    #[error("Timeout while requesting image url")]
    Timeout,

    /// The remote host could not be reached
    #[error("Connection error while requesting image url")]
    Connection(String),

    /// The server answered with a non-2xx status
    #[error("HTTP error while requesting image url: {message}")]
    HttpStatus { status: u16, message: String },

    /// Any other transport failure (invalid URL, broken body stream, ...)
    #[error("Unknown error while requesting image url")]
    UnknownNetwork(String),

    /// The payload was fetched but is not a decodable image
    #[error("Unidentified image: {0}")]
    Decode(String),
}

impl FetchError {
    /// Get the kind of this error.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Timeout => FetchErrorKind::Timeout,
            FetchError::Connection(_) => FetchErrorKind::ConnectionError,
            FetchError::HttpStatus { .. } => FetchErrorKind::HttpStatusError,
            FetchError::UnknownNetwork(_) => FetchErrorKind::UnknownNetworkError,
            FetchError::Decode(_) => FetchErrorKind::DecodeError,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Timeout first: a connect timeout is also a connect error
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            FetchError::UnknownNetwork(err.to_string())
        }
    }
}

impl From<image::ImageError> for FetchError {
    fn from(err: image::ImageError) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Validation errors for window requests.
///
/// These are client errors and map to HTTP 400. The first three messages are
/// fixed by the public API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("Start index less than zero")]
    NegativeStart { start: i64 },

    #[error("Buffer capacity is less or equal zero")]
    NonPositiveCapacity { capacity: i64 },

    #[error("Start index is more than width * height")]
    StartOutOfRange { start: i64, pixel_count: i128 },

    #[error("Width and height must be greater than zero")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Width and height must not exceed {max_dimension}")]
    DimensionTooLarge {
        width: i64,
        height: i64,
        max_dimension: u32,
    },
}

impl WindowError {
    /// Stable identifier used in JSON error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            WindowError::NegativeStart { .. } => "invalid_start",
            WindowError::NonPositiveCapacity { .. } => "invalid_capacity",
            WindowError::StartOutOfRange { .. } => "start_out_of_range",
            WindowError::InvalidDimensions { .. } => "invalid_dimensions",
            WindowError::DimensionTooLarge { .. } => "dimension_too_large",
        }
    }
}
