use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use crate::retry::retry_on_sqlite_busy;

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("User already exists")]
    EmailTaken,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    /// Register a user. Email uniqueness is case-insensitive and enforced
    /// by the database, so a racing duplicate still maps to `EmailTaken`.
    pub async fn create(pool: &SqlitePool, data: &NewUser) -> Result<User, UserError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };

        let result = retry_on_sqlite_busy(|| async {
            sqlx::query(
                "INSERT INTO users (id, name, email, password_hash, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(pool)
            .await
            .map(|_| ())
        })
        .await;

        match result {
            Ok(()) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(UserError::EmailTaken)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
