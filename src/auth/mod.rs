// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Cookie-carried JWT sessions.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `POST /api/auth/login`
//! 2. The [`UserDirectory`] checks them
//! 3. The [`TokenCodec`] issues an HS256 token with `sub`, `email`, `role`,
//!    `iat`, `exp`, `iss`, `aud`
//! 4. The token goes back in the HTTP-only `auth-token` cookie
//! 5. Every later request is checked by the request gate and/or the
//!    extractors in [`extractor`], which verify the cookie from scratch
//!
//! ## Security
//!
//! - Verification failures are never surfaced to clients; they mean
//!   "not signed in"
//! - No clock skew tolerance
//! - Logout only deletes the cookie; the token itself stays valid until
//!   `exp`

pub mod claims;
pub mod codec;
pub mod cookie;
pub mod directory;
pub mod error;
pub mod extractor;
pub mod roles;

pub use claims::{AuthenticatedUser, Claims, NewClaims, Session};
#[cfg(test)]
pub use codec::StaticSecret;
pub use codec::{EnvSecretProvider, SecretProvider, TokenCodec};
pub use cookie::{SessionCookie, AUTH_COOKIE_NAME};
pub use directory::{DemoUserDirectory, DirectoryError, DirectoryUser, UserDirectory};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, CurrentSession, RequireAuth};
pub use roles::Role;
