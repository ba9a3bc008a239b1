//! Authentication Middleware
//! Mission: Gate protected routes on a valid token naming an existing actor

use crate::{error::ApiError, response::TOKEN_COOKIE, state::AppState};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

/// Resolve the bearer token to an actor and attach it to the request.
///
/// Handlers behind this layer read the caller with `Extension<User>`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        extract_token(req.headers(), state.config.use_cookie).ok_or_else(ApiError::unauthorized)?;

    let actor_id = state.jwt_handler.verify(&token).map_err(|e| {
        debug!("Rejected token: {:#}", e);
        ApiError::unauthorized()
    })?;

    // Token may outlive the actor it names
    let user = state
        .users
        .get_user_by_id(&actor_id)?
        .ok_or_else(ApiError::unauthorized)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Bearer header first; the `token` cookie only when cookie transport is enabled
pub fn extract_token(headers: &HeaderMap, use_cookie: bool) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    if from_header.is_some() || !use_cookie {
        return from_header;
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty() && t != "none")
}
