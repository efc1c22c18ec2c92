// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Request Gate
//!
//! Axum middleware evaluated before every request reaches a handler.
//!
//! ## Policy
//!
//! 1. Bypass paths (`/api`, `/_next`, anything with a `.`) pass untouched
//! 2. The path is classified against the [`RoutePolicy`]
//! 3. The `auth-token` cookie, if any, is verified from scratch
//! 4. [`decide`] picks one of:
//!    - protected page + token that fails verification (for any reason,
//!      expiry included): redirect to plain `/login` and clear the cookie
//!    - protected page + no cookie: redirect to `/login?redirect=<path>`
//!    - login/register + valid session: redirect to the requested protected
//!      page or the landing page
//!    - otherwise: allow, tagging signed-in requests with identity headers
//!
//! Protected pages fail closed, everything else fails open. Verification
//! errors are logged and never propagate.

pub mod routes;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use url::form_urlencoded;

pub use routes::{PathClass, RoutePolicy};

use crate::auth::{extractor::authenticate, AuthError, AuthenticatedUser, SessionCookie};
use crate::state::AppState;

/// Forwarded header carrying the verified user ID.
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Forwarded header set to `true` on verified requests.
pub const USER_AUTHENTICATED_HEADER: HeaderName = HeaderName::from_static("x-user-authenticated");

/// Result of checking the session cookie.
#[derive(Debug)]
pub enum SessionCheck {
    /// No cookie
    Anonymous,
    /// Cookie verified
    Valid(AuthenticatedUser),
    /// Cookie present but rejected
    Rejected(AuthError),
}

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward to the handler, with the verified user if there is one
    Allow(Option<AuthenticatedUser>),
    /// Send to the login page
    Login {
        return_to: Option<String>,
        clear_cookie: bool,
    },
    /// Send somewhere else (post-login target or landing page)
    RedirectTo(String),
}

/// The gate's decision for a classified path.
///
/// `redirect_param` is the `redirect` query parameter of the request, if
/// any.
pub fn decide(
    policy: &RoutePolicy,
    class: PathClass,
    path: &str,
    redirect_param: Option<&str>,
    session: SessionCheck,
) -> Decision {
    match (class, session) {
        (PathClass::Bypass, _) => Decision::Allow(None),
        (PathClass::Protected, SessionCheck::Rejected(_)) => Decision::Login {
            return_to: None,
            clear_cookie: true,
        },
        (PathClass::Protected, SessionCheck::Valid(user)) => Decision::Allow(Some(user)),
        (PathClass::Protected, SessionCheck::Anonymous) => Decision::Login {
            return_to: Some(path.to_string()),
            clear_cookie: false,
        },
        (PathClass::AuthOnly, SessionCheck::Valid(_)) => {
            let target = redirect_param
                .and_then(|r| policy.safe_return_target(r))
                .unwrap_or(policy.landing_path.as_str());
            Decision::RedirectTo(target.to_string())
        }
        (_, SessionCheck::Valid(user)) => Decision::Allow(Some(user)),
        _ => Decision::Allow(None),
    }
}

fn check_session(state: &AppState, jar: &CookieJar) -> SessionCheck {
    let Some(token) = SessionCookie::read(jar) else {
        return SessionCheck::Anonymous;
    };

    match authenticate(&state.codec, token) {
        Ok(user) => SessionCheck::Valid(user),
        Err(e) => {
            if e.is_hard_token_failure() {
                tracing::warn!(error = %e, "Rejected session token");
            } else {
                tracing::debug!(error = %e, "Session token no longer valid");
            }
            SessionCheck::Rejected(e)
        }
    }
}

fn redirect_param(request: &Request) -> Option<String> {
    let query = request.uri().query()?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "redirect")
        .map(|(_, value)| value.into_owned())
}

/// Attach identity to a request forwarded to a handler.
fn tag_identity(request: &mut Request, user: AuthenticatedUser) {
    match HeaderValue::from_str(&user.user_id) {
        Ok(value) => {
            let headers = request.headers_mut();
            headers.insert(USER_ID_HEADER, value);
            headers.insert(USER_AUTHENTICATED_HEADER, HeaderValue::from_static("true"));
        }
        Err(_) => {
            tracing::warn!(user_id = ?user.user_id, "User ID is not a valid header value");
        }
    }
    request.extensions_mut().insert(user);
}

/// The request gate middleware.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/dashboard", get(dashboard))
///     .layer(axum::middleware::from_fn_with_state(state.clone(), request_gate))
///     .with_state(state);
/// ```
pub async fn request_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    // Identity headers only ever come from this gate.
    request.headers_mut().remove(USER_ID_HEADER);
    request.headers_mut().remove(USER_AUTHENTICATED_HEADER);

    let path = request.uri().path().to_string();
    let class = state.routes.classify(&path);
    if class == PathClass::Bypass {
        return next.run(request).await;
    }

    let session = check_session(&state, &jar);
    let redirect = redirect_param(&request);
    let decision = decide(&state.routes, class, &path, redirect.as_deref(), session);

    tracing::debug!(path = %path, class = ?class, decision = ?decision, "Request gate");

    match decision {
        Decision::Allow(user) => {
            if let Some(user) = user {
                tag_identity(&mut request, user);
            }
            next.run(request).await
        }
        Decision::Login {
            return_to,
            clear_cookie,
        } => {
            let location = state.routes.login_url(return_to.as_deref());
            let redirect = Redirect::temporary(&location);
            if clear_cookie {
                (SessionCookie::clear(jar), redirect).into_response()
            } else {
                redirect.into_response()
            }
        }
        Decision::RedirectTo(location) => Redirect::temporary(&location).into_response(),
    }
}
