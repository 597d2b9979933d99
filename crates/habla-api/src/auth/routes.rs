use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::middleware::AuthUser;
use crate::{ApiState, error::ApiError, middleware::rate_limit};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/auth/me", get(auth_me))
        .route("/auth/sign-out", post(sign_out))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_REPLENISH_SECONDS,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
}

async fn auth_me(auth_user: AuthUser) -> Json<AuthUser> {
    Json(auth_user)
}

/// Forget the caller on this server. The token itself stays valid until it
/// expires; the identity provider owns revocation.
async fn sign_out(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<SignOutResponse>, ApiError> {
    let signed_out = state.auth.sign_out(auth_user.user_id).await;
    Ok(Json(SignOutResponse { signed_out }))
}
