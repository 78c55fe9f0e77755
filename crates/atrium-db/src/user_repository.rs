use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use atrium_core::error::AppError;
use atrium_core::models::{NewUser, Role, User, UserCredentials};

/// Repository for user persistence in PostgreSQL.
#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. Returns the stored record.
    pub async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let roles: Vec<String> = user.roles.iter().map(|r| r.to_string()).collect();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, name, roles, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, roles, password_hash, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&roles)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("A user with email '{}' already exists", user.email))
            }
            other => AppError::Database(other.to_string()),
        })?;

        row.try_into()
    }

    /// Look up a user by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, roles, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    /// Look up a user with their password hash, for login verification.
    pub async fn credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, roles, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        row.map(|row| {
            let password_hash = row.password_hash.clone();
            Ok(UserCredentials {
                user: row.try_into()?,
                password_hash,
            })
        })
        .transpose()
    }

    /// List users, newest first.
    pub async fn list(&self, limit: usize) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, roles, password_hash, created_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    roles: Vec<String>,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let roles = row
            .roles
            .iter()
            .map(|r| r.parse::<Role>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::Database(format!("Corrupt role column: {e}")))?;

        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            roles,
            created_at: row.created_at,
        })
    }
}
