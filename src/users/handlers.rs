use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{normalize_email, CreateUserRequest, Pagination, UpdateUserRequest, UserResponse};
use super::repo::{NewUser, UserChanges};
use crate::{
    auth::middleware::AuthUser,
    error::{AppError, AppResult},
    extractors::ValidatedJson,
    state::AppState,
};

const USER_NOT_FOUND: &str = "User not found";

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}

/// Mounted under `/restricted`, behind `require_auth`.
pub fn restricted_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).put(update_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<UserResponse>)> {
    let email = normalize_email(&payload.email);
    let password_hash = state.hasher.hash(&payload.password)?;

    let user = state
        .users
        .create(NewUser {
            email,
            name: payload.name,
            password_hash,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "create user failed");
            e
        })?;

    info!(user_id = %user.id, "user registered");

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/restricted/users/{}", user.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(user.into())))
}

#[instrument(skip(state, auth), fields(subject = %auth.subject))]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id)?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, auth, payload), fields(subject = %auth.subject))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id)?;
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    let password_hash = payload
        .password
        .as_deref()
        .map(|plain| state.hasher.hash(plain))
        .transpose()?;

    let changes = UserChanges {
        email: payload.email.as_deref().map(normalize_email),
        name: payload.name,
        password_hash,
    };
    let rehashed = changes.password_hash.is_some();

    let user = state
        .users
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    info!(user_id = %user.id, rehashed, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, auth, page), fields(subject = %auth.subject))]
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    page: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let Query(page) = page.map_err(|e| AppError::validation(e.body_text()))?;
    let (limit, offset) = page.clamped();
    let users = state.users.list(limit, offset).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Ids are UUIDs; anything else cannot name a user.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(USER_NOT_FOUND))
}
