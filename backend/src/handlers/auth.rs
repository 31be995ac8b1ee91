use axum::{extract::State, http::HeaderMap, Extension, Json};

use crate::auth::{
    jwt::create_access_token,
    middleware::{authenticated_username, AuthUser},
};
use crate::dto::{AppJson, AuthStatusResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use crate::error::{AppError, AppResult};
use crate::models::user::UserProfile;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    let body = body.normalized()?;

    state
        .users
        .register(&body.username, &body.email, &body.password)
        .await?;

    Ok(Json(MessageResponse::ok(
        "Registration successful! You can now login.",
    )))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    let user = state.users.authenticate(username, &body.password).await?;
    let token = create_access_token(&user.username, &state.config)?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        user: UserProfile::from(&user),
        access_token: token.access_token,
        expires_in: token.expires_in,
    }))
}

/// Tokens are stateless; the client discards its copy.
pub async fn logout(Extension(auth_user): Extension<AuthUser>) -> Json<MessageResponse> {
    tracing::info!(username = %auth_user.username, "User logged out");
    Json(MessageResponse::ok("Logout successful"))
}

pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<AuthStatusResponse> {
    let user = match authenticated_username(&headers, &state) {
        Ok(Some(username)) => state.users.get(&username).await,
        _ => None,
    };

    Json(AuthStatusResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(UserProfile::from),
    })
}
