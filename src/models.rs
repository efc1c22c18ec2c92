// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the auth endpoints and the JSON page
//! views. Nothing here ever carries a password back to the client.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AuthenticatedUser, DirectoryUser, Role};

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /api/auth/login`.
///
/// Both fields are optional at the JSON level so that a missing field is
/// reported as missing credentials rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// `(email, password)` when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().filter(|s| !s.is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        Some((email, password))
    }
}

/// Public view of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl From<DirectoryUser> for UserSummary {
    fn from(user: DirectoryUser) -> Self {
        Self {
            id: user.id,
            email: Some(user.email),
            role: user.role,
        }
    }
}

impl From<&AuthenticatedUser> for UserSummary {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.user_id.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Response of a successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Response of `GET /api/auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: UserSummary,
    /// Token issue time (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    /// Token expiry time (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl From<&AuthenticatedUser> for CurrentUserResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            user: user.into(),
            issued_at: user.issued_at_utc().map(|t| t.to_rfc3339()),
            expires_at: user.expires_at_utc().map(|t| t.to_rfc3339()),
        }
    }
}

// =============================================================================
// Pages
// =============================================================================

/// JSON stand-in for a rendered page.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: &'static str,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<CurrentUserResponse>,
}

impl PageView {
    pub fn new(page: &'static str, user: Option<&AuthenticatedUser>) -> Self {
        Self {
            page,
            authenticated: user.is_some(),
            session: user.map(CurrentUserResponse::from),
        }
    }
}
