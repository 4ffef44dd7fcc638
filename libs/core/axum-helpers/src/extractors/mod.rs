//! Custom extractors for Axum handlers.
//!
//! Each one turns axum's plain-text rejections into [`AppError`](crate::AppError)
//! JSON responses.

pub mod json_body;
pub mod query_params;

pub use json_body::JsonBody;
pub use query_params::QueryParams;
