/// User model
///
/// The identity principal. Users own categories and todos; the service
/// layer never creates users itself; they come in through registration.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(320) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgArguments;
use sqlx::Arguments;
use uuid::Uuid;

use crate::db::repo::{Entity, HasId, Insert};

/// A user account.
///
/// Passwords are stored as Argon2id PHC hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4).
    pub id: Uuid,

    /// Email address, unique across all users.
    pub email: String,

    /// Argon2id password hash.
    pub password_hash: String,

    /// Whether the account may log in.
    pub is_active: bool,

    /// Whether the email address has been verified.
    pub is_verified: bool,

    /// Administrative flag.
    pub is_superuser: bool,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static str =
        "id, email, password_hash, is_active, is_verified, is_superuser, created_at";
}

impl HasId for User {
    type Id = Uuid;
}

/// Input for creating a new user (registration only).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,

    /// Argon2id hash, not the plaintext password.
    pub password_hash: String,
}

impl Insert for CreateUser {
    type Entity = User;

    const INSERT_COLUMNS: &'static str = "email, password_hash";
    const PLACEHOLDERS: &'static str = "$1, $2";

    fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        args.add(self.email.clone());
        args.add(self.password_hash.clone());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_metadata_matches() {
        assert_eq!(
            CreateUser::INSERT_COLUMNS.split(", ").count(),
            CreateUser::PLACEHOLDERS.split(", ").count()
        );
    }

    #[test]
    fn test_columns_cover_struct() {
        // One column per FromRow field.
        assert_eq!(User::COLUMNS.split(", ").count(), 7);
    }
}
