use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

/// Stateless acknowledgment; no server-side token invalidation exists,
/// so the client simply discards its token.
pub async fn logout() -> ApiSuccess<LogoutResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: "Logged out successfully".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
