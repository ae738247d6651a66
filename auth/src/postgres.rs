//! PostgreSQL credential store.
//!
//! Email uniqueness is enforced by a unique index on the normalized
//! email column, so the duplicate check and the insert are one atomic
//! statement even across processes.

use crate::store::CredentialStore;
use campus_events_core::validate::normalize_email;
use campus_events_core::{
    CollegeDetails, Error, Identity, Result, Role, StudentDetails, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::str::FromStr;

/// PostgreSQL credential store.
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    /// Create a store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the identities table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unavailable` if the DDL fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS identities (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                email_norm TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                student_details JSONB,
                college_details JSONB,
                created_at TIMESTAMPTZ NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable(e: sqlx::Error) -> Error {
    Error::Unavailable {
        reason: e.to_string(),
    }
}

fn row_to_identity(row: &PgRow) -> Result<Identity> {
    let role: String = row.try_get("role").map_err(unavailable)?;
    let student: Option<Json<StudentDetails>> =
        row.try_get("student_details").map_err(unavailable)?;
    let college: Option<Json<CollegeDetails>> =
        row.try_get("college_details").map_err(unavailable)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(unavailable)?;

    Ok(Identity {
        id: UserId(row.try_get("id").map_err(unavailable)?),
        name: row.try_get("name").map_err(unavailable)?,
        email: row.try_get("email").map_err(unavailable)?,
        password_hash: row.try_get("password_hash").map_err(unavailable)?,
        role: Role::from_str(&role)?,
        student_details: student.map(|Json(d)| d),
        college_details: college.map(|Json(d)| d),
        created_at,
    })
}

impl CredentialStore for PostgresCredentialStore {
    async fn create_identity(&self, identity: &Identity) -> Result<Identity> {
        sqlx::query(
            r"
            INSERT INTO identities
                (id, name, email, email_norm, password_hash, role,
                 student_details, college_details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(identity.id.0)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(normalize_email(&identity.email))
        .bind(&identity.password_hash)
        .bind(identity.role.to_string())
        .bind(identity.student_details.clone().map(Json))
        .bind(identity.college_details.clone().map(Json))
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                Error::DuplicateEmail
            } else {
                unavailable(e)
            }
        })?;

        Ok(identity.clone())
    }

    async fn get_identity(&self, user_id: UserId) -> Result<Identity> {
        let row = sqlx::query("SELECT * FROM identities WHERE id = $1")
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or(Error::NotFound { resource: "identity" })?;

        row_to_identity(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let row = sqlx::query("SELECT * FROM identities WHERE email_norm = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        row.as_ref().map(row_to_identity).transpose()
    }

    async fn update_identity(&self, identity: &Identity) -> Result<Identity> {
        let result = sqlx::query(
            r"
            UPDATE identities
            SET student_details = $2, college_details = $3
            WHERE id = $1
            ",
        )
        .bind(identity.id.0)
        .bind(identity.student_details.clone().map(Json))
        .bind(identity.college_details.clone().map(Json))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound { resource: "identity" });
        }
        Ok(identity.clone())
    }
}
