//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::info;

use sharenote_core::{new_v7, Error, NewUser, Result, User, UserCredentials, UserRepository};

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn column_taken(&self, column: &str, value: &str) -> Result<bool> {
        // `column` is one of two compile-time constants, never caller input
        let sql = format!("SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1)", column);
        let taken: bool = sqlx::query_scalar(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(taken)
    }
}

fn row_to_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
    }
}

/// Map a unique-constraint violation from a racing insert onto `Conflict`.
fn map_insert_error(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let msg = match db_err.constraint() {
                Some("users_email_key") => "Email already exists",
                _ => "Username already exists",
            };
            return Error::Conflict(msg.to_string());
        }
    }
    Error::Database(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, req: NewUser) -> Result<User> {
        if self.column_taken("username", &req.username).await? {
            return Err(Error::Conflict("Username already exists".to_string()));
        }
        if self.column_taken("email", &req.email).await? {
            return Err(Error::Conflict("Email already exists".to_string()));
        }

        let id = new_v7();
        let row = sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at_utc)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, username, email",
        )
        .bind(id)
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        info!(
            subsystem = "db",
            component = "users",
            op = "insert",
            user_id = %id,
            "User created"
        );
        Ok(row_to_user(&row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| UserCredentials {
            user: row_to_user(&r),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        sqlx::query("SELECT id, username, email FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .map(|r| row_to_user(&r))
            .ok_or_else(|| Error::NotFound("User with this email does not exist".to_string()))
    }
}
