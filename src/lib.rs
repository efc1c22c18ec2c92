// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie Session Gate - cookie-based session authentication for web apps
//!
//! Email/password login issues a signed session token in an HTTP-only
//! cookie. A request gate in front of every route verifies that cookie and
//! decides whether the request may proceed, must sign in, or should be sent
//! elsewhere.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Token codec, session cookie, user directory, extractors
//! - `gate` - Route classification and the request gate middleware
//! - `config` - Startup configuration from the environment
//! - `logging` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod models;
pub mod state;
