//! Shared types for the restaurant admin backend
//!
//! Menu, order and sales report models together with the unified error
//! system, used by `admin-server` and by anything consuming its JSON.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
