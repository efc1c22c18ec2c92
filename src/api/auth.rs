// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, logout and current-session endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use crate::auth::{Auth, AuthError, NewClaims, SessionCookie};
use crate::models::{CurrentUserResponse, LoginRequest, LoginResponse, MessageResponse};
use crate::state::AppState;

/// Sign in with email and password.
///
/// On success the session token is returned in the `auth-token` cookie.
/// Unknown emails and wrong passwords produce the same `401`.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal error"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), AuthError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable login body");
            return Err(AuthError::MissingCredentials);
        }
    };

    let (email, password) = request
        .credentials()
        .ok_or(AuthError::MissingCredentials)?;

    let user = state
        .directory
        .find_user(email, password)
        .await
        .map_err(|e| {
            error!(error = %e, "User directory lookup failed");
            AuthError::Internal(e.to_string())
        })?
        .ok_or_else(|| {
            info!("Login rejected: invalid credentials");
            AuthError::InvalidCredentials
        })?;

    let claims = NewClaims::new(user.id.clone())
        .with_email(user.email.clone())
        .with_role(user.role.as_str());
    let token = state.codec.issue(claims).inspect_err(|e| {
        error!(error = %e, user_id = %user.id, "Failed to issue session token");
    })?;

    info!(user_id = %user.id, role = %user.role, "User logged in");

    let jar = state.session_cookie.set(jar, token);
    Ok((
        jar,
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: user.into(),
        }),
    ))
}

/// Sign out by deleting the session cookie.
///
/// Always succeeds, with or without a session. The token itself is not
/// revoked and stays valid until it expires.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        SessionCookie::clear(jar),
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
}

/// The user behind the current session cookie.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "No valid session"),
    )
)]
pub async fn current_user(Auth(user): Auth) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse::from(&user))
}
