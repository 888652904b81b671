use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::Profile;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserDirectory;
use crate::user::errors::AuthError;
use crate::user::errors::ConflictField;

const SELECT_COLUMNS: &str = "id, username, email, password_hash, is_active, last_login, \
                              first_name, last_name, avatar_url, created_at";

/// Postgres-backed identity record store.
///
/// Uniqueness is enforced by the unique indexes on email and username;
/// a race-lost insert surfaces as the same conflict error as any other
/// duplicate, translated here and never leaked as a raw storage error.
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> AuthError {
    AuthError::Database(e.to_string())
}

fn user_from_row(row: &PgRow) -> Result<User, AuthError> {
    Ok(User {
        id: UserId(row.try_get("id").map_err(db_error)?),
        username: Username::new(row.try_get("username").map_err(db_error)?)?,
        email: EmailAddress::new(row.try_get("email").map_err(db_error)?)?,
        password_hash: row.try_get("password_hash").map_err(db_error)?,
        is_active: row.try_get("is_active").map_err(db_error)?,
        last_login: row.try_get("last_login").map_err(db_error)?,
        profile: Profile {
            first_name: row.try_get("first_name").map_err(db_error)?,
            last_name: row.try_get("last_name").map_err(db_error)?,
            avatar_url: row.try_get("avatar_url").map_err(db_error)?,
        },
        created_at: row.try_get("created_at").map_err(db_error)?,
    })
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_active, last_login,
                               first_name, last_name, avatar_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.last_login)
        .bind(&user.profile.first_name)
        .bind(&user.profile.last_name)
        .bind(&user.profile.avatar_url)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    // Email is checked first so it wins when both collide
                    if db_err.constraint() == Some("users_email_key") {
                        return AuthError::Conflict {
                            field: ConflictField::Email,
                        };
                    }
                    if db_err.constraint() == Some("users_username_key") {
                        return AuthError::Conflict {
                            field: ConflictField::Username,
                        };
                    }
                }
            }
            AuthError::Database(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<User>, AuthError> {
        // One logical read either way; the identifier was classified at
        // the boundary and emails are stored lowercase.
        let (sql, value) = match identifier {
            LoginIdentifier::Email(email) => (
                format!("SELECT {SELECT_COLUMNS} FROM users WHERE email = $1"),
                email.as_str(),
            ),
            LoginIdentifier::Username(username) => (
                format!("SELECT {SELECT_COLUMNS} FROM users WHERE username = $1"),
                username.as_str(),
            ),
        };

        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_last_login(
        &self,
        id: &UserId,
        timestamp: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id.0)
            .bind(timestamp)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
