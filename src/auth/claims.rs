// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims carried inside a session token.
///
/// `iat`, `exp`, `iss` and `aud` are stamped by
/// [`TokenCodec::issue`](super::codec::TokenCodec::issue); callers only
/// choose the identity fields through [`NewClaims`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// User role; see [`Role::from_claim`] for how absent values resolve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

/// Identity fields for a token about to be issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClaims {
    pub subject: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl NewClaims {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            email: None,
            role: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Authenticated user information extracted from a verified token.
///
/// This is the type handlers see for the user making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    /// User ID (`sub` claim)
    pub user_id: String,

    /// Email (if present in the token)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// User's role
    pub role: Role,

    /// Token issue time (Unix seconds)
    pub issued_at: i64,

    /// Token expiration (Unix seconds)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    pub fn from_claims(claims: Claims) -> Self {
        let role = Role::from_claim(claims.role.as_deref());

        Self {
            user_id: claims.sub,
            email: claims.email,
            role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }

    /// Check if the user has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    pub fn issued_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.issued_at, 0)
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }
}

/// Outcome of looking up the session for a request.
///
/// Verification failures are folded into `Unauthenticated`; the reason is
/// only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Authenticated(AuthenticatedUser),
    Unauthenticated,
}

impl Session {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }

    pub fn into_user(self) -> Option<AuthenticatedUser> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }
}

impl From<Option<AuthenticatedUser>> for Session {
    fn from(user: Option<AuthenticatedUser>) -> Self {
        user.map_or(Session::Unauthenticated, Session::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims {
            sub: "2".to_string(),
            email: Some("admin@example.com".to_string()),
            role: Some("admin".to_string()),
            iat: 1_700_000_000,
            exp: 1_700_604_800,
            iss: "your-app".to_string(),
            aud: "your-app-users".to_string(),
        }
    }

    #[test]
    fn from_claims_extracts_identity() {
        let user = AuthenticatedUser::from_claims(sample_claims());
        assert_eq!(user.user_id, "2");
        assert_eq!(user.email.as_deref(), Some("admin@example.com"));
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.expires_at, 1_700_604_800);
    }

    #[test]
    fn from_claims_defaults_to_user_role() {
        let mut claims = sample_claims();
        claims.role = None;
        let user = AuthenticatedUser::from_claims(claims);
        assert_eq!(user.role, Role::User);
        assert!(!user.has_role(Role::Admin));
    }

    #[test]
    fn optional_claims_are_omitted_when_absent() {
        let mut claims = sample_claims();
        claims.email = None;
        claims.role = None;
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("email").is_none());
        assert!(json.get("role").is_none());
        assert_eq!(json["sub"], "2");
    }

    #[test]
    fn timestamps_convert_to_utc() {
        let user = AuthenticatedUser::from_claims(sample_claims());
        assert_eq!(
            user.issued_at_utc().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn session_from_option() {
        let user = AuthenticatedUser::from_claims(sample_claims());
        assert_eq!(Session::from(Some(user.clone())).user(), Some(&user));
        assert_eq!(Session::from(None).user(), None);
        assert_eq!(Session::Authenticated(user.clone()).into_user(), Some(user));
    }
}
