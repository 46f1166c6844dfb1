//! Usage infrastructure - quota enforcement over the usage repository

mod gate;

pub use gate::{AdmittedKey, GateError, QuotaGate};
