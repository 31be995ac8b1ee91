use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::{headers::UserAgent, TypedHeader};

use crate::auth::fingerprint::{account_key, anonymous_key, DEVICE_ID_HEADER};
use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::store::UserKey;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

/// Who a journal request acts for. Handlers only see the resolved key.
#[derive(Debug, Clone)]
pub struct Identity {
    pub key: UserKey,
    pub username: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Resolves the bearer token to a username, `Ok(None)` when no token was sent.
pub fn authenticated_username(headers: &HeaderMap, state: &AppState) -> Result<Option<String>, AppError> {
    match bearer_token(headers) {
        Some(token) => Ok(Some(verify_token(token, &state.config)?.claims.sub)),
        None => Ok(None),
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let username = authenticated_username(req.headers(), &state)?.ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser { username });
    Ok(next.run(req).await)
}

/// Journal routes accept anonymous callers. A presented token must be valid;
/// without one the caller is keyed by device id or IP + user agent.
pub async fn resolve_identity(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    user_agent: Option<TypedHeader<UserAgent>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = match authenticated_username(req.headers(), &state)? {
        Some(username) => Identity {
            key: account_key(&username),
            username: Some(username),
        },
        None => {
            let device_id = req
                .headers()
                .get(DEVICE_ID_HEADER)
                .and_then(|v| v.to_str().ok());
            let key = anonymous_key(
                device_id,
                connect_info.map(|ConnectInfo(addr)| addr.ip()),
                user_agent.as_ref().map(|TypedHeader(ua)| ua.as_str()),
            );
            Identity {
                key,
                username: None,
            }
        }
    };

    tracing::debug!(
        user_key = %identity.key,
        username = identity.username.as_deref().unwrap_or("-"),
        "Resolved journal identity"
    );
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
