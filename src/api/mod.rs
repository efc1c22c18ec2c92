// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::header,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::{SetSensitiveRequestHeadersLayer, SetSensitiveResponseHeadersLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{AuthenticatedUser, Role},
    error::not_found,
    gate::request_gate,
    models::{CurrentUserResponse, LoginRequest, LoginResponse, MessageResponse, UserSummary},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod pages;

/// Build the application router.
///
/// Every route, including the fallback, runs behind the request gate.
pub fn router(state: AppState) -> Router {
    let app_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::current_user))
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/forgot-password", get(pages::forgot_password))
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
        .route("/dashboard", get(pages::dashboard))
        .route("/profile", get(pages::profile))
        .route("/settings", get(pages::settings))
        .route("/admin", get(pages::admin))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state.clone());

    Router::new()
        .merge(app_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(from_fn_with_state(state, request_gate))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(SetSensitiveRequestHeadersLayer::new([
                    header::COOKIE,
                    header::AUTHORIZATION,
                ]))
                .layer(SetSensitiveResponseHeadersLayer::new([header::SET_COOKIE]))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::current_user,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            MessageResponse,
            CurrentUserResponse,
            UserSummary,
            AuthenticatedUser,
            Role,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Cookie session login and logout"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
