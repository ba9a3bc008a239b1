//! Authentication API Endpoints
//! Mission: Registration, login, profile and password lifecycle

use crate::{
    auth::{
        models::{
            ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
            ResetPasswordRequest, UpdateDetailsRequest, User,
        },
        reset::{digest_reset_token, issue_reset_token},
    },
    error::ApiError,
    response::{logout_cookie, Envelope, TokenResponse},
    state::AppState,
    validation::{
        self, CHANGE_PASSWORD_RULES, PROFILE_UPDATE_RULES, RESET_PASSWORD_RULES, USER_RULES,
    },
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Duration;
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// Register - POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(body) = payload?;
    let req: RegisterRequest = validation::parse(body, USER_RULES)?;

    let user = state.users.create_user(&req)?;

    send_token(&state, &user)
}

/// Login - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(body) = payload?;
    let req: LoginRequest = validation::parse(body, &[])?;

    let (Some(email), Some(password)) = (
        req.user_email.filter(|e| !e.trim().is_empty()),
        req.user_password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Please provide an email and password".to_string(),
        ));
    };

    info!("🔐 Login attempt: {}", email);

    // Unknown email and wrong password are indistinguishable to the client
    let Some(user) = state.users.verify_credentials(&email, &password)? else {
        warn!("❌ Failed login attempt: {}", email);
        return Err(ApiError::invalid_credentials());
    };

    info!("✅ Login successful: {} ({})", user.user_email, user.role().as_str());

    send_token(&state, &user)
}

/// Logout - GET /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        CookieJar::new().add(logout_cookie(&state.config)),
        Json(Envelope::data(json!({}))),
    )
}

/// Current actor - GET /api/v1/auth/me
pub async fn get_me(Extension(user): Extension<User>) -> Json<Envelope<User>> {
    Json(Envelope::data(user))
}

/// Forgot password - POST /api/v1/auth/forgotpassword
pub async fn forgot_password(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<&'static str>>, ApiError> {
    let Json(body) = payload?;
    let req: ForgotPasswordRequest = validation::parse(body, &[])?;

    let email = req
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Please provide an email".to_string()))?;

    let user = state
        .users
        .get_user_by_email(&email)?
        .ok_or_else(|| ApiError::NotFound("There is no user with that email".to_string()))?;

    let reset = issue_reset_token(Duration::minutes(state.config.reset_token_expire_minutes));
    state
        .users
        .set_reset_token(&user.id, &reset.digest, reset.expires_at)?;

    let reset_url = format!(
        "{}/api/v1/auth/resetpassword/{}",
        state.config.public_url.trim_end_matches('/'),
        reset.plain
    );

    if let Err(e) = state.reset_delivery.deliver(&user, &reset_url).await {
        error!("Reset delivery failed for {}: {:#}", user.user_email, e);
        state.users.clear_reset_token(&user.id)?;
        return Err(ApiError::Server("Email could not be sent".to_string()));
    }

    Ok(Json(Envelope::data("Email sent")))
}

/// Reset password - PUT /api/v1/auth/resetpassword/:token
pub async fn reset_password(
    State(state): State<AppState>,
    Path(reset_token): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(body) = payload?;

    let user = state
        .users
        .find_by_reset_digest(&digest_reset_token(&reset_token))?
        .ok_or_else(|| ApiError::Validation("Invalid token".to_string()))?;

    let req: ResetPasswordRequest = validation::parse(body, RESET_PASSWORD_RULES)?;
    let password = req.password.unwrap_or_default();

    // Consumes the reset token as well
    state.users.set_password(&user.id, &password)?;

    send_token(&state, &user)
}

/// Change password - PUT /api/v1/auth/changepassword
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<TokenResponse, ApiError> {
    let Json(body) = payload?;
    let req: ChangePasswordRequest = validation::parse(body, CHANGE_PASSWORD_RULES)?;
    let current = req.current_password.unwrap_or_default();
    let new_password = req.new_password.unwrap_or_default();

    if !state.users.hasher().verify(&current, &user.password_hash) {
        warn!("❌ Wrong current password for {}", user.id);
        return Err(ApiError::Unauthorized("Password is incorrect".to_string()));
    }

    state.users.set_password(&user.id, &new_password)?;

    send_token(&state, &user)
}

/// Update details - PUT /api/v1/auth/update
pub async fn update_details(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<User>>, ApiError> {
    let Json(body) = payload?;
    let changes: UpdateDetailsRequest = validation::parse(body, PROFILE_UPDATE_RULES)?;

    if changes.is_empty() {
        return Err(ApiError::Validation(
            "Please enter either email or name or both".to_string(),
        ));
    }

    let updated = state
        .users
        .update_details(&user.id, &changes)?
        .ok_or_else(ApiError::unauthorized)?;

    Ok(Json(Envelope::data(updated)))
}

fn send_token(state: &AppState, user: &User) -> Result<TokenResponse, ApiError> {
    let token = state.jwt_handler.issue(user.id)?;
    Ok(TokenResponse::new(token, &state.config))
}
