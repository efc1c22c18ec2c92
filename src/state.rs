// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{SecretProvider, SessionCookie, TokenCodec, UserDirectory};
use crate::config::{AppConfig, ConfigError};
use crate::gate::RoutePolicy;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub codec: Arc<TokenCodec>,
    pub directory: Arc<dyn UserDirectory>,
    pub routes: Arc<RoutePolicy>,
    pub session_cookie: SessionCookie,
}

impl AppState {
    pub fn new(
        codec: TokenCodec,
        directory: Arc<dyn UserDirectory>,
        routes: RoutePolicy,
        secure_cookie: bool,
    ) -> Self {
        let session_cookie = SessionCookie::new(secure_cookie, codec.ttl_secs());
        Self {
            codec: Arc::new(codec),
            directory,
            routes: Arc::new(routes),
            session_cookie,
        }
    }

    /// Build state from startup configuration with the default route table.
    pub fn from_config(
        config: &AppConfig,
        secrets: &dyn SecretProvider,
        directory: Arc<dyn UserDirectory>,
    ) -> Result<Self, ConfigError> {
        let codec =
            TokenCodec::from_provider(secrets, config.token.clone(), config.environment)?;
        Ok(Self::new(
            codec,
            directory,
            RoutePolicy::default(),
            config.environment.is_production(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::auth::DemoUserDirectory;
    use crate::config::TokenSettings;

    pub const TEST_SECRET: &[u8] = b"test-secret-key-32-bytes-long!!!";

    /// State with a fixed secret, default settings and demo users.
    pub fn test_state() -> AppState {
        AppState::new(
            TokenCodec::new(TEST_SECRET, TokenSettings::default()),
            Arc::new(DemoUserDirectory),
            RoutePolicy::default(),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{DemoUserDirectory, StaticSecret};
    use crate::config::Environment;

    #[test]
    fn cookie_lifetime_mirrors_token_ttl() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let state = AppState::from_config(
            &config,
            &StaticSecret::new("s3cret"),
            Arc::new(DemoUserDirectory),
        )
        .unwrap();

        assert_eq!(state.session_cookie.max_age_secs, 7 * 24 * 60 * 60);
        assert!(!state.session_cookie.secure);
    }

    #[test]
    fn production_requires_secret_and_secures_cookie() {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.environment = Environment::Production;

        assert!(AppState::from_config(
            &config,
            &StaticSecret::new(Vec::new()),
            Arc::new(DemoUserDirectory)
        )
        .is_err());

        let state = AppState::from_config(
            &config,
            &StaticSecret::new("s3cret"),
            Arc::new(DemoUserDirectory),
        )
        .unwrap();
        assert!(state.session_cookie.secure);
    }
}
