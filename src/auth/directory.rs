// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential lookup.
//!
//! [`UserDirectory`] is the seam a real deployment replaces with a
//! database-backed, hashed-credential store. [`DemoUserDirectory`] is a
//! placeholder: plaintext demo credentials compared in memory, with no
//! hashing, no lockout and no timing protection.

use async_trait::async_trait;
use thiserror::Error;

use super::roles::Role;

/// A user record returned by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// The directory could not answer (as opposed to "no such user").
#[derive(Debug, Error)]
#[error("user directory unavailable: {0}")]
pub struct DirectoryError(pub String);

/// Looks up users by credentials.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The user matching both `email` and `password`, or `None`.
    ///
    /// Implementations must not reveal which of the two did not match.
    async fn find_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<DirectoryUser>, DirectoryError>;
}

struct DemoCredential {
    id: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

const DEMO_CREDENTIALS: &[DemoCredential] = &[
    DemoCredential {
        id: "1",
        email: "email@example.com",
        password: "password123",
        role: Role::User,
    },
    DemoCredential {
        id: "2",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
    },
];

/// Fixed in-memory demo accounts. Not for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoUserDirectory;

#[async_trait]
impl UserDirectory for DemoUserDirectory {
    async fn find_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<DirectoryUser>, DirectoryError> {
        let user = DEMO_CREDENTIALS
            .iter()
            .find(|c| c.email == email && c.password == password)
            .map(|c| DirectoryUser {
                id: c.id.to_string(),
                email: c.email.to_string(),
                role: c.role,
            });

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_demo_user() {
        let user = DemoUserDirectory
            .find_user("email@example.com", "password123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn finds_demo_admin() {
        let user = DemoUserDirectory
            .find_user("admin@example.com", "admin123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, "2");
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let wrong_password = DemoUserDirectory
            .find_user("admin@example.com", "password123")
            .await
            .unwrap();
        let unknown = DemoUserDirectory.find_user("x@x.com", "wrong").await.unwrap();

        assert_eq!(wrong_password, None);
        assert_eq!(unknown, None);
    }

    #[tokio::test]
    async fn email_match_is_exact() {
        let user = DemoUserDirectory
            .find_user("EMAIL@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(user, None);
    }
}
