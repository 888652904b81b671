use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let identifier = LoginIdentifier::parse(&body.username_or_email);

    state
        .auth_service
        .login(&identifier, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|ref response| ApiSuccess::new(StatusCode::OK, response.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username_or_email: String,
    password: String,
}
