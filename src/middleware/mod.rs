pub mod auth;
pub mod csp;
pub mod response;

pub use auth::{require_login_api, require_login_web, CurrentUser};
pub use csp::content_security_policy;
pub use response::{ApiResponse, ApiResult, Message};
