//! Request and response types shared across handlers

pub mod error;
pub mod query;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use query::Query;
