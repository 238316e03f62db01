/// Backend access module
///
/// Thin async wrappers over the photographies REST API: upload, list,
/// delete (one and many) and confirm-printed.

pub mod client;

pub use client::{ApiClient, ApiError};
