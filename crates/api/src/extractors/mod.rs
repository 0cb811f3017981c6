//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod api_key;
pub mod client_ip;
pub mod validated_json;

pub use api_key::{AdminKey, API_KEY_HEADER};
pub use client_ip::ClientIp;
pub use validated_json::ValidatedJson;
