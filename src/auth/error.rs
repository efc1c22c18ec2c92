// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Authentication error type.
///
/// Token variants only ever reach server-side logs: the gate and the
/// session extractors collapse them into "unauthenticated". Credential
/// variants are returned by the login endpoint.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login request without an email or password
    #[error("Email and password are required")]
    MissingCredentials,
    /// Email/password pair not found (never says which one was wrong)
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// No session cookie, or a session that failed verification
    #[error("Authentication required")]
    Unauthenticated,
    /// Token cannot be parsed
    #[error("Token is malformed")]
    MalformedToken,
    /// Token signature does not match the signing secret
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token `exp` is in the past
    #[error("Token has expired")]
    TokenExpired,
    /// Token `iss` does not match configuration
    #[error("Token issuer is invalid")]
    IssuerMismatch,
    /// Token `aud` does not match configuration
    #[error("Token audience is invalid")]
    AudienceMismatch,
    /// Authenticated, but the role is not sufficient
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
    /// Unexpected failure; the detail is logged, never sent to the client
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::IssuerMismatch
            | AuthError::AudienceMismatch => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is a token verification failure.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::IssuerMismatch
                | AuthError::AudienceMismatch
        )
    }

    /// A token that was never valid here, as opposed to one that merely
    /// expired. Only used to pick the log level; clients see no difference.
    pub fn is_hard_token_failure(&self) -> bool {
        self.is_token_error() && !matches!(self, AuthError::TokenExpired)
    }

    /// Client-facing message.
    ///
    /// Token failures all read as "Authentication required" and internal
    /// errors carry no detail.
    fn public_message(&self) -> String {
        match self {
            AuthError::Internal(_) => "Internal server error".to_string(),
            e if e.is_token_error() => AuthError::Unauthenticated.to_string(),
            e => e.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::IssuerMismatch,
            ErrorKind::InvalidAudience => AuthError::AudienceMismatch,
            _ => AuthError::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
