//! Repository for `users` and `refresh_sessions`.
//!
//! Password hashing happens in the API layer; this repo only stores and
//! returns the PHC hash strings.

use sqlx::PgPool;

use lastmile_core::types::{DbId, Timestamp};

use crate::models::user::{RefreshSession, User};

/// Column list for `users` queries.
const USER_COLUMNS: &str = "\
    id, username, password_hash, role, is_active, created_at, updated_at";

/// Column list for `refresh_sessions` queries.
const SESSION_COLUMNS: &str = "\
    id, user_id, token_hash, expires_at, revoked, created_at, updated_at";

/// Provides account and refresh-session operations.
pub struct UserRepo;

impl UserRepo {
    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    /// Create a user with an already-hashed password.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, role) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (the login key).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash.
    pub async fn set_password_hash(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Refresh sessions
    // -----------------------------------------------------------------------

    /// Store a refresh session keyed by the SHA-256 hash of the token.
    pub async fn create_session(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<RefreshSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_sessions (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, RefreshSession>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live (unrevoked, unexpired) session by token hash.
    pub async fn find_live_session(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<RefreshSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM refresh_sessions \
             WHERE token_hash = $1 AND NOT revoked AND expires_at > NOW()"
        );
        sqlx::query_as::<_, RefreshSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke one session by token hash. Returns `true` if a row changed.
    pub async fn revoke_session(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked = TRUE \
             WHERE token_hash = $1 AND NOT revoked",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every session a user holds.
    pub async fn revoke_all_sessions(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked = TRUE \
             WHERE user_id = $1 AND NOT revoked",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
