//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::OrderNotFound | Self::DishNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists => StatusCode::CONFLICT,

            // Transient, client can retry
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::Unknown
            | Self::InternalError
            | Self::OrderSourceError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // Validation and malformed input
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
