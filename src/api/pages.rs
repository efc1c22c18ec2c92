// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Page handlers.
//!
//! Each page answers with a JSON [`PageView`] describing what would be
//! rendered and for whom. Access control is layered: the request gate
//! redirects first, the extractors here check again.

use axum::Json;

use crate::auth::{AdminOnly, CurrentSession, RequireAuth};
use crate::models::PageView;

pub async fn home(CurrentSession(session): CurrentSession) -> Json<PageView> {
    Json(PageView::new("home", session.user()))
}

pub async fn about(CurrentSession(session): CurrentSession) -> Json<PageView> {
    Json(PageView::new("about", session.user()))
}

pub async fn forgot_password(CurrentSession(session): CurrentSession) -> Json<PageView> {
    Json(PageView::new("forgot-password", session.user()))
}

/// Login form. Signed-in visitors never get here; the gate redirects them.
pub async fn login(CurrentSession(session): CurrentSession) -> Json<PageView> {
    Json(PageView::new("login", session.user()))
}

pub async fn register(CurrentSession(session): CurrentSession) -> Json<PageView> {
    Json(PageView::new("register", session.user()))
}

/// Landing page after login.
pub async fn dashboard(RequireAuth(user): RequireAuth) -> Json<PageView> {
    Json(PageView::new("dashboard", Some(&user)))
}

pub async fn profile(RequireAuth(user): RequireAuth) -> Json<PageView> {
    Json(PageView::new("profile", Some(&user)))
}

pub async fn settings(RequireAuth(user): RequireAuth) -> Json<PageView> {
    Json(PageView::new("settings", Some(&user)))
}

/// Admin console; `403` for signed-in non-admins.
pub async fn admin(AdminOnly(user): AdminOnly) -> Json<PageView> {
    Json(PageView::new("admin", Some(&user)))
}
