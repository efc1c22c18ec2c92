// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session cookie adapter.
//!
//! The cookie is opaque here: it carries whatever the token codec issued.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE_NAME: &str = "auth-token";

/// Fixed attributes of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookie {
    /// Add the `Secure` attribute (production only)
    pub secure: bool,
    /// `Max-Age` in seconds, mirrors the token lifetime
    pub max_age_secs: i64,
}

impl SessionCookie {
    pub fn new(secure: bool, max_age_secs: i64) -> Self {
        Self {
            secure,
            max_age_secs,
        }
    }

    fn build(&self, token: String) -> Cookie<'static> {
        Cookie::build((AUTH_COOKIE_NAME, token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.max_age_secs))
            .build()
    }

    /// Attach (or overwrite) the session cookie.
    pub fn set(&self, jar: CookieJar, token: String) -> CookieJar {
        jar.add(self.build(token))
    }

    /// The raw session token, if one was sent.
    pub fn read(jar: &CookieJar) -> Option<&str> {
        jar.get(AUTH_COOKIE_NAME)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
    }

    /// Remove the session cookie from the browser.
    ///
    /// Always emits a removal cookie, whether or not the request carried one.
    pub fn clear(jar: CookieJar) -> CookieJar {
        let mut removal = Cookie::build((AUTH_COOKIE_NAME, "")).path("/").build();
        removal.make_removal();
        jar.add(removal)
    }
}
