//! # Account Repository
//!
//! Registered customers. Orders reference `users.id`.
//!
//! Passwords are stored as argon2 PHC strings and are never returned from
//! this module; [`Account`] carries no credential field.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use bookshop_core::validation;
use bookshop_core::Account;

/// Full `users` row, hash included. Private to this module.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    pass: String,
    email: String,
    created_at: chrono::DateTime<Utc>,
}

impl From<UserRow> for Account {
    fn from(row: UserRow) -> Self {
        Account {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Registers a new account.
    ///
    /// ## Errors
    /// * `missing username` / `missing password` / `missing email`
    /// * `username "<u>" is already added`
    pub async fn register(&self, username: &str, password: &str, email: &str) -> DbResult<Account> {
        validation::validate_username(username)?;
        validation::validate_password(password)?;
        validation::validate_email(email)?;

        let username = username.trim();
        let email = email.trim();
        debug!(username = %username, "Registering account");

        let mut tx = self.pool.begin().await?;

        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user = ?1")
            .bind(username)
            .fetch_one(&mut *tx)
            .await?;
        if taken > 0 {
            return Err(DbError::already_exists(format!("username \"{username}\"")));
        }

        let hash = hash_password(password)?;
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (user, pass, email, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(username)
        .bind(hash)
        .bind(email)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        debug!(id = id, "Account registered");
        Ok(Account {
            id,
            username: username.to_string(),
            email: email.to_string(),
            created_at,
        })
    }

    /// Checks credentials and returns the account.
    ///
    /// ## Errors
    /// * `username "<u>" not found`
    /// * `invalid password for account "<u>"`
    pub async fn login(&self, username: &str, password: &str) -> DbResult<Account> {
        let username = username.trim();
        debug!(username = %username, "Logging in");

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, user AS username, pass, email, created_at
            FROM users
            WHERE user = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::Authentication(format!("username \"{username}\" not found")))?;

        if !verify_password(password, &row.pass) {
            warn!(username = %username, "Rejected login");
            return Err(DbError::Authentication(format!(
                "invalid password for account \"{username}\""
            )));
        }

        Ok(row.into())
    }

    /// Gets an account by id.
    pub async fn get(&self, id: i64) -> DbResult<Account> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, user AS username, pass, email, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("account", id))?;

        Ok(row.into())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;

    async fn repo() -> AccountRepository {
        Database::in_memory().await.unwrap().accounts()
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let repo = repo().await;
        let account = repo
            .register("doej", "password123", "doej@example.com")
            .await
            .unwrap();
        assert_eq!(account.id, 1);

        let logged_in = repo.login("doej", "password123").await.unwrap();
        assert_eq!(logged_in.id, account.id);
        assert_eq!(logged_in.email, "doej@example.com");

        let fetched = repo.get(account.id).await.unwrap();
        assert_eq!(fetched.username, "doej");
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let repo = repo().await;
        repo.register("doej", "password123", "doej@example.com")
            .await
            .unwrap();

        let err = repo.login("doej", "password124").await.unwrap_err();
        assert!(matches!(err, DbError::Authentication(_)));
        assert_eq!(err.to_string(), "invalid password for account \"doej\"");
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let repo = repo().await;
        let err = repo.login("nobody", "password123").await.unwrap_err();
        assert_eq!(err.to_string(), "username \"nobody\" not found");

        let err = repo.get(5).await.unwrap_err();
        assert_eq!(err.to_string(), "account id \"5\" not found");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = repo().await;
        repo.register("doej", "password123", "doej@example.com")
            .await
            .unwrap();

        let err = repo
            .register("doej", "other", "other@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "username \"doej\" is already added");
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let repo = repo().await;
        let err = repo.register("", "pw", "a@b").await.unwrap_err();
        assert_eq!(err.to_string(), "missing username");

        let err = repo.register("doej", "", "a@b").await.unwrap_err();
        assert_eq!(err.to_string(), "missing password");

        let err = repo.register("doej", "pw", " ").await.unwrap_err();
        assert_eq!(err.to_string(), "missing email");

        let err = repo.register("doej", "pw", "doej").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let db = Database::in_memory().await.unwrap();
        db.accounts()
            .register("doej", "password123", "doej@example.com")
            .await
            .unwrap();

        let stored: String = sqlx::query_scalar("SELECT pass FROM users WHERE user = 'doej'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_ne!(stored, "password123");
        assert!(stored.starts_with("$argon2"));
    }
}
