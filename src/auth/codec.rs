// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification (HS256).
//!
//! ## Security
//!
//! - One symmetric secret per process, resolved once at startup through a
//!   [`SecretProvider`]
//! - Issuer and audience are stamped on issue and enforced on verify
//! - No clock skew leeway: a token is rejected as soon as `exp < now`
//! - No revocation list: a token stays valid until `exp`, even after logout

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{Claims, NewClaims};
use super::error::AuthError;
use crate::config::{ConfigError, Environment, TokenSettings, JWT_SECRET_ENV};

/// Development-only signing secret used when none is configured.
///
/// Anyone who knows this value can mint sessions. It is refused in
/// production.
pub const DEV_FALLBACK_SECRET: &str = "your-super-secret-jwt-key-change-this-in-production";

/// Source of the token signing secret.
///
/// The environment-backed provider is the default; a secrets manager can be
/// plugged in here without touching the codec or the gate.
pub trait SecretProvider: Send + Sync {
    /// The signing secret, or `None` if this provider has none configured.
    fn signing_secret(&self) -> Option<Vec<u8>>;
}

/// Reads the secret from an environment variable (`JWT_SECRET` by default).
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    var: String,
}

impl EnvSecretProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new(JWT_SECRET_ENV)
    }
}

impl SecretProvider for EnvSecretProvider {
    fn signing_secret(&self) -> Option<Vec<u8>> {
        std::env::var(&self.var)
            .ok()
            .filter(|s| !s.is_empty())
            .map(String::into_bytes)
    }
}

/// A fixed, in-process secret.
#[cfg(test)]
#[derive(Clone)]
pub struct StaticSecret(Vec<u8>);

#[cfg(test)]
impl StaticSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }
}

#[cfg(test)]
impl SecretProvider for StaticSecret {
    fn signing_secret(&self) -> Option<Vec<u8>> {
        (!self.0.is_empty()).then(|| self.0.clone())
    }
}

/// Encodes and verifies session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    settings: TokenSettings,
}

impl TokenCodec {
    /// Create a codec from a raw secret.
    pub fn new(secret: &[u8], settings: TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&settings.issuer]);
        validation.set_audience(&[&settings.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            settings,
        }
    }

    /// Create a codec from a [`SecretProvider`].
    ///
    /// Without a configured secret, production refuses to start and every
    /// other environment falls back to [`DEV_FALLBACK_SECRET`] with a warning.
    pub fn from_provider(
        provider: &dyn SecretProvider,
        settings: TokenSettings,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let secret = match provider.signing_secret() {
            Some(secret) => secret,
            None if environment.is_production() => {
                return Err(ConfigError::MissingSecret {
                    name: JWT_SECRET_ENV,
                })
            }
            None => {
                tracing::warn!(
                    "{} is not set; signing sessions with the insecure development secret",
                    JWT_SECRET_ENV
                );
                DEV_FALLBACK_SECRET.as_bytes().to_vec()
            }
        };

        Ok(Self::new(&secret, settings))
    }

    /// Token lifetime in whole seconds.
    pub fn ttl_secs(&self) -> i64 {
        i64::try_from(self.settings.ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// Issue a signed token valid from now for the configured lifetime.
    pub fn issue(&self, claims: NewClaims) -> Result<String, AuthError> {
        self.issue_at(claims, Utc::now().timestamp())
    }

    /// Issue a token as if it were `now` (Unix seconds).
    pub(crate) fn issue_at(&self, claims: NewClaims, now: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: claims.subject,
            email: claims.email,
            role: claims.role,
            iat: now,
            exp: now.saturating_add(self.ttl_secs()),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Runs the full check (signature, structure, expiry, issuer, audience)
    /// on every call; nothing is cached.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use std::time::Duration;

    const SECRET: &[u8] = b"test-secret-key-32-bytes-long!!!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, TokenSettings::default())
    }

    fn user_claims() -> NewClaims {
        NewClaims::new("1")
            .with_email("email@example.com")
            .with_role("user")
    }

    #[test]
    fn verify_returns_issued_identity() {
        let codec = codec();
        let token = codec.issue(user_claims()).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email.as_deref(), Some("email@example.com"));
        assert_eq!(claims.role.as_deref(), Some("user"));
        assert!(claims.iat < claims.exp);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(claims.iss, "your-app");
        assert_eq!(claims.aud, "your-app-users");
    }

    #[test]
    fn optional_claims_survive_when_absent() {
        let codec = codec();
        let token = codec.issue(NewClaims::new("42")).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, None);
        assert_eq!(claims.role, None);
    }

    #[test]
    fn different_secret_is_invalid_signature() {
        let token = codec().issue(user_claims()).unwrap();
        let other = TokenCodec::new(b"another-secret-entirely", TokenSettings::default());

        assert!(matches!(
            other.verify(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_is_invalid_signature() {
        let codec = codec();
        let token = codec.issue(user_claims()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let mut claims: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        claims["role"] = "admin".into();
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());

        let token = format!("{}.{}.{}", parts[0], forged, parts[2]);
        assert!(matches!(
            codec.verify(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let issued = Utc::now().timestamp() - codec.ttl_secs() - 10;
        let token = codec.issue_at(user_claims(), issued).unwrap();

        assert!(matches!(codec.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec();
        for token in ["", "not-a-token", "a.b.c", "a.b"] {
            assert!(
                matches!(codec.verify(token), Err(AuthError::MalformedToken)),
                "expected malformed for {token:?}"
            );
        }
    }

    #[test]
    fn unsigned_token_is_malformed() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            br#"{"sub":"2","role":"admin","iat":1,"exp":9999999999,"iss":"your-app","aud":"your-app-users"}"#,
        );
        let token = format!("{header}.{payload}.");

        assert!(matches!(
            codec().verify(&token),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn issuer_and_audience_are_enforced() {
        let token = codec().issue(user_claims()).unwrap();

        let other_issuer = TokenCodec::new(
            SECRET,
            TokenSettings {
                issuer: "someone-else".into(),
                ..TokenSettings::default()
            },
        );
        assert!(matches!(
            other_issuer.verify(&token),
            Err(AuthError::IssuerMismatch)
        ));

        let other_audience = TokenCodec::new(
            SECRET,
            TokenSettings {
                audience: "other-users".into(),
                ..TokenSettings::default()
            },
        );
        assert!(matches!(
            other_audience.verify(&token),
            Err(AuthError::AudienceMismatch)
        ));
    }

    #[test]
    fn custom_ttl_is_applied() {
        let codec = TokenCodec::new(
            SECRET,
            TokenSettings {
                ttl: Duration::from_secs(90),
                ..TokenSettings::default()
            },
        );
        let claims = codec.verify(&codec.issue(user_claims()).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 90);
    }

    #[test]
    fn missing_secret_is_fatal_in_production() {
        let empty = StaticSecret::new(Vec::new());
        let result =
            TokenCodec::from_provider(&empty, TokenSettings::default(), Environment::Production);
        assert!(matches!(result, Err(ConfigError::MissingSecret { .. })));
    }

    #[test]
    fn missing_secret_falls_back_in_development() {
        let empty = StaticSecret::new(Vec::new());
        let codec =
            TokenCodec::from_provider(&empty, TokenSettings::default(), Environment::Development)
                .unwrap();
        let token = codec.issue(user_claims()).unwrap();

        let fallback = TokenCodec::new(DEV_FALLBACK_SECRET.as_bytes(), TokenSettings::default());
        assert!(fallback.verify(&token).is_ok());
    }

    #[test]
    fn provided_secret_is_used() {
        let provider = StaticSecret::new(SECRET.to_vec());
        let codec =
            TokenCodec::from_provider(&provider, TokenSettings::default(), Environment::Production)
                .unwrap();
        let token = codec.issue(user_claims()).unwrap();
        assert!(self::codec().verify(&token).is_ok());
    }
}
