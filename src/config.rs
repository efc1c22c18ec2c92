// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from them once at startup. Nothing here is mutated
//! after the server starts.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `APP_ENV` | `production` or `development` | `development` |
//! | `JWT_SECRET` | HS256 signing secret | Insecure default (development only) |
//! | `JWT_ISSUER` | Expected/stamped JWT issuer claim | `your-app` |
//! | `JWT_AUDIENCE` | Expected/stamped JWT audience claim | `your-app-users` |
//! | `JWT_EXPIRES_IN` | Token lifetime (`7d`, `2 hours`, `1w`, `30m`, or seconds) | `7d` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! ## Deployment hazard
//!
//! Issuer, audience and secret all have hardcoded fallbacks. The secret
//! fallback is refused when `APP_ENV=production`; see
//! [`crate::auth::codec::TokenCodec::from_provider`].

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Environment variable name for the bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the deployment environment.
///
/// Only the value `production` (case-insensitive) changes behavior: session
/// cookies get the `Secure` attribute and `JWT_SECRET` becomes mandatory.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the token issuer.
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";

/// Environment variable name for the token audience.
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";

/// Environment variable name for the token lifetime.
pub const JWT_EXPIRES_IN_ENV: &str = "JWT_EXPIRES_IN";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ISSUER: &str = "your-app";
pub const DEFAULT_AUDIENCE: &str = "your-app-users";

/// Default token and cookie lifetime (7 days).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid port: {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} is not a valid duration: {value:?} (expected e.g. 7d, 2 hours, 1w, 45s)")]
    InvalidDuration { name: &'static str, value: String },

    #[error("{name} must be set when APP_ENV=production")]
    MissingSecret { name: &'static str },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Token issuance settings (everything except the secret).
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            ttl: DEFAULT_TOKEN_TTL,
        }
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub token: TokenSettings,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let ttl = match get(JWT_EXPIRES_IN_ENV) {
            Some(raw) => parse_duration(&raw).ok_or(ConfigError::InvalidDuration {
                name: JWT_EXPIRES_IN_ENV,
                value: raw,
            })?,
            None => DEFAULT_TOKEN_TTL,
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment: get(APP_ENV_ENV)
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            log_format: get(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
            token: TokenSettings {
                issuer: get(JWT_ISSUER_ENV).unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
                audience: get(JWT_AUDIENCE_ENV).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
                ttl,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const YEAR: f64 = 365.25 * DAY;

fn unit_seconds(unit: &str) -> Option<f64> {
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(MINUTE),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(HOUR),
        "d" | "day" | "days" => Some(DAY),
        "w" | "week" | "weeks" => Some(WEEK),
        "y" | "yr" | "yrs" | "year" | "years" => Some(YEAR),
        _ => None,
    }
}

/// `123` or `1.5`; no sign, no exponent, no bare dot.
fn is_plain_number(s: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((whole, frac)) => digits(whole) && digits(frac),
        None => digits(s),
    }
}

/// Parse a token lifetime.
///
/// Accepts a bare number of seconds or `<number>[ ]<unit>` with units
/// `s`/`sec`/`second`, `m`/`min`/`minute`, `h`/`hr`/`hour`, `d`/`day`,
/// `w`/`week`, `y`/`yr`/`year` (plurals too, case-insensitive), e.g. `7d`,
/// `2 hours`, `1.5h`, `+1w`, `7 days from now`. Fractions round to the
/// nearest second. Zero and negative lifetimes are rejected.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim().to_ascii_lowercase();
    let raw = raw.strip_suffix(" from now").unwrap_or(&raw);
    let raw = raw.strip_prefix('+').map(str::trim_start).unwrap_or(raw);

    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    if !is_plain_number(number) {
        return None;
    }

    let unit = unit.trim_start();
    let scale = if unit.is_empty() {
        1.0
    } else {
        unit_seconds(unit)?
    };

    let secs = (number.parse::<f64>().ok()? * scale).round();
    (secs >= 1.0 && secs < u64::MAX as f64).then(|| Duration::from_secs(secs as u64))
}
