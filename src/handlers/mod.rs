// handlers/mod.rs - request handlers in two tiers
//
// Public (no session) → Protected (login gate). Each tier serves both the
// HTML surface (`web`) and the JSON surface (`api`) from the same auth and
// store functions.

pub mod form;
pub mod protected;
pub mod public;
pub mod views;

use crate::error::{ApiError, WebError};

/// Method fallback for HTML routes
pub async fn web_method_not_allowed() -> WebError {
    WebError::method_not_allowed()
}

/// Method fallback for JSON routes
pub async fn api_method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
