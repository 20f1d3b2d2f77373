//! PostgreSQL implementation of UserRepository.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::scheduling::{NewUser, User, UserPatch};
use crate::ports::UserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{decode, decode_user_id, violated_constraint};

const USER_COLUMNS: &str =
    "uid, first_name, last_name, email, user_type, avatar_url, created_at, updated_at";

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
    release_slot_on_cancel: bool,
}

impl PostgresUserRepository {
    /// Creates the repository. With `release_slot_on_cancel` set, deleting a
    /// patient frees the slots their active appointments held.
    pub fn new(pool: PgPool, release_slot_on_cancel: bool) -> Self {
        Self {
            pool,
            release_slot_on_cancel,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    uid: String,
    first_name: String,
    last_name: String,
    email: String,
    user_type: String,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            uid: decode_user_id("uid", row.uid)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: decode("user_type", &row.user_type)?,
            avatar_url: row.avatar_url,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn write_conflict(constraint: &str, email: Option<&str>) -> Option<DomainError> {
    match constraint {
        "users_email_key" | "users_pkey" => Some(DomainError::new(
            ErrorCode::EmailAlreadyRegistered,
            format!("Email {} is already registered", email.unwrap_or_default()),
        )),
        _ => None,
    }
}

fn map_write_error(context: &str, email: Option<&str>, e: sqlx::Error) -> DomainError {
    match violated_constraint(&e).and_then(|c| write_conflict(c, email)) {
        Some(err) => err,
        None => DomainError::database(context, e),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let now = Timestamp::now();
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (
                uid, first_name, last_name, email, user_type, avatar_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.uid.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.avatar_url)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error("Failed to insert user", Some(&user.email), e))?;

        row.try_into()
    }

    async fn find_by_uid(&self, uid: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE uid = $1"))
                .bind(uid.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch user", e))?;

        row.map(User::try_from).transpose()
    }

    async fn update(&self, uid: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET updated_at = ");
        query.push_bind(Utc::now());
        if let Some(first_name) = &patch.first_name {
            query.push(", first_name = ").push_bind(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            query.push(", last_name = ").push_bind(last_name.clone());
        }
        if let Some(email) = &patch.email {
            query.push(", email = ").push_bind(email.clone());
        }
        if let Some(avatar_url) = &patch.avatar_url {
            query.push(", avatar_url = ").push_bind(avatar_url.clone());
        }
        query.push(" WHERE uid = ").push_bind(uid.as_str().to_string());
        query.push(" RETURNING ").push(USER_COLUMNS);

        let row: Option<UserRow> = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error("Failed to update user", patch.email.as_deref(), e))?;

        row.map(User::try_from).transpose()
    }

    async fn delete(&self, uid: &UserId) -> Result<Option<User>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        // The cascade removes the patient's appointments but leaves their slots.
        if self.release_slot_on_cancel {
            sqlx::query(
                r#"
                UPDATE slots SET status = 'available', updated_at = now()
                WHERE id IN (
                    SELECT slot_id FROM appointments
                    WHERE patient_id = $1 AND status <> 'cancelled'
                )
                "#,
            )
            .bind(uid.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to release patient slots", e))?;
        }

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "DELETE FROM users WHERE uid = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(uid.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to delete user", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        row.map(User::try_from).transpose()
    }
}
