// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the current session.
//!
//! All of them resolve the session the same way: the identity the request
//! gate already verified for this request, or else a fresh verification of
//! the `auth-token` cookie. A token that fails verification is treated
//! exactly like a missing one.
//!
//! ```rust,ignore
//! async fn dashboard(RequireAuth(user): RequireAuth) -> impl IntoResponse {
//!     // user is AuthenticatedUser; anonymous visitors were sent to /login
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::{AuthError, AuthenticatedUser, Role, Session, SessionCookie, TokenCodec};
use crate::state::AppState;

/// Verify a raw session token into a user.
pub fn authenticate(codec: &TokenCodec, token: &str) -> Result<AuthenticatedUser, AuthError> {
    codec.verify(token).map(AuthenticatedUser::from_claims)
}

/// Resolve the session for a request.
pub fn resolve_session(parts: &Parts, state: &AppState) -> Session {
    if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
        return Session::Authenticated(user.clone());
    }

    let jar = CookieJar::from_headers(&parts.headers);
    let Some(token) = SessionCookie::read(&jar) else {
        return Session::Unauthenticated;
    };

    authenticate(&state.codec, token)
        .inspect_err(|e| tracing::debug!(error = %e, "Session token rejected"))
        .ok()
        .into()
}

/// The current session, authenticated or not. Never rejects.
pub struct CurrentSession(pub Session);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(CurrentSession(resolve_session(parts, state)))
    }
}

/// Extractor for API handlers: rejects with a JSON `401` when there is no
/// valid session.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_session(parts, state)
            .into_user()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Extractor for page handlers: redirects to the login page when there is
/// no valid session.
///
/// The request gate normally redirects first; this is the handler-side
/// check behind it.
pub struct RequireAuth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_session(parts, state)
            .into_user()
            .map(RequireAuth)
            .ok_or_else(|| Redirect::temporary(&state.routes.login_path))
    }
}

/// Page extractor that requires the admin role.
///
/// Anonymous visitors are redirected to login; signed-in non-admins get
/// `403`.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !user.has_role(Role::Admin) {
            tracing::warn!(user_id = %user.user_id, "Non-admin attempted to access admin page");
            return Err(AuthError::InsufficientPermissions.into_response());
        }

        Ok(AdminOnly(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NewClaims;
    use crate::config::TokenSettings;
    use crate::state::test_support::test_state;
    use axum::http::{header, Request, StatusCode};

    fn parts_with_cookie(cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/dashboard");
        if let Some(value) = cookie {
            builder = builder.header(header::COOKIE, format!("auth-token={value}"));
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn token_for(state: &AppState, role: &str) -> String {
        state
            .codec
            .issue(NewClaims::new("7").with_email("e@example.com").with_role(role))
            .unwrap()
    }

    #[tokio::test]
    async fn current_session_is_unauthenticated_without_cookie() {
        let state = test_state();
        let mut parts = parts_with_cookie(None);

        let CurrentSession(session) = CurrentSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(session, Session::Unauthenticated);
    }

    #[tokio::test]
    async fn current_session_verifies_cookie() {
        let state = test_state();
        let token = token_for(&state, "user");
        let mut parts = parts_with_cookie(Some(&token));

        let CurrentSession(session) = CurrentSession::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        let user = session.into_user().unwrap();
        assert_eq!(user.user_id, "7");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn foreign_token_is_treated_as_absent() {
        let state = test_state();
        let foreign = TokenCodec::new(b"someone-elses-secret", TokenSettings::default())
            .issue(NewClaims::new("7"))
            .unwrap();
        let mut parts = parts_with_cookie(Some(&foreign));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
    }

    #[tokio::test]
    async fn extractor_prefers_gate_identity() {
        let state = test_state();
        let mut parts = parts_with_cookie(None);
        let user = AuthenticatedUser {
            user_id: "from-gate".to_string(),
            email: None,
            role: Role::Admin,
            issued_at: 0,
            expires_at: 0,
        };
        parts.extensions.insert(user);

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, "from-gate");
    }

    #[tokio::test]
    async fn require_auth_redirects_to_login() {
        let state = test_state();
        let mut parts = parts_with_cookie(Some("garbage"));

        let Err(redirect) = RequireAuth::from_request_parts(&mut parts, &state).await else {
            panic!("expected redirect");
        };
        let response = redirect.into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn admin_only_forbids_regular_users() {
        let state = test_state();
        let token = token_for(&state, "user");
        let mut parts = parts_with_cookie(Some(&token));

        let Err(response) = AdminOnly::from_request_parts(&mut parts, &state).await else {
            panic!("expected rejection");
        };
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_only_admits_admins() {
        let state = test_state();
        let token = token_for(&state, "admin");
        let mut parts = parts_with_cookie(Some(&token));

        let AdminOnly(user) = AdminOnly::from_request_parts(&mut parts, &state)
            .await
            .unwrap_or_else(|_| panic!("admin rejected"));
        assert!(user.has_role(Role::Admin));
    }
}
