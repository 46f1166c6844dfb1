//! Infrastructure layer - Storage backends, key management and observability

pub mod api_key;
pub mod logging;
pub mod observability;
pub mod storage;
pub mod usage;
