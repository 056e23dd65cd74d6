use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::dto::{LoginRequest, TokenResponse},
    error::{AppError, AppResult},
    extractors::ValidatedJson,
    state::AppState,
    users::dto::normalize_email,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = normalize_email(&payload.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        state.hasher.verify_dummy(&payload.password);
        warn!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !state.hasher.verify(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.jwt.mint(&user.email)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.ttl().as_secs(),
    }))
}
