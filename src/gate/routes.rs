// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static route table and path classification.

use url::form_urlencoded;

/// How the request gate treats a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Framework-internal, API or static asset: no policy at all
    Bypass,
    /// Requires a valid session
    Protected,
    /// Only for visitors without a session (login, register)
    AuthOnly,
    /// Anyone
    Public,
}

/// Immutable route table, built once at startup and shared by `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Prefixes that skip the gate entirely
    pub bypass_prefixes: Vec<String>,
    /// Prefixes that require a session
    pub protected_prefixes: Vec<String>,
    /// Exact paths only for anonymous visitors
    pub auth_only_paths: Vec<String>,
    /// Where anonymous visitors are sent
    pub login_path: String,
    /// Where signed-in visitors are sent when they open an auth-only page
    pub landing_path: String,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            bypass_prefixes: owned(&["/_next", "/api"]),
            protected_prefixes: owned(&["/dashboard", "/profile", "/admin", "/settings"]),
            auth_only_paths: owned(&["/login", "/register"]),
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

/// File-extension heuristic for static assets: any `.` in the path.
pub fn looks_like_static_asset(path: &str) -> bool {
    path.contains('.')
}

impl RoutePolicy {
    /// Classify a request path.
    ///
    /// Checks run in a fixed order: bypass prefixes, static-asset
    /// heuristic, protected prefixes, auth-only paths. Anything left is
    /// public.
    pub fn classify(&self, path: &str) -> PathClass {
        if self
            .bypass_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return PathClass::Bypass;
        }
        if looks_like_static_asset(path) {
            return PathClass::Bypass;
        }
        if self.is_protected(path) {
            return PathClass::Protected;
        }
        if self.auth_only_paths.iter().any(|p| p == path) {
            return PathClass::AuthOnly;
        }
        PathClass::Public
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Login URL, optionally carrying the page to return to after login.
    pub fn login_url(&self, return_to: Option<&str>) -> String {
        match return_to {
            Some(path) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("redirect", path)
                    .finish();
                format!("{}?{}", self.login_path, query)
            }
            None => self.login_path.clone(),
        }
    }

    /// The post-login target if `redirect` is a local path to a protected
    /// page. Anything else (absolute URLs, protocol-relative URLs, public
    /// pages) is ignored.
    pub fn safe_return_target<'a>(&self, redirect: &'a str) -> Option<&'a str> {
        if !redirect.starts_with('/') || redirect.starts_with("//") || redirect.contains('\\') {
            return None;
        }
        let path = redirect
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        self.is_protected(path).then_some(redirect)
    }
}
