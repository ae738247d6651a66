//! PostgreSQL event and registration store.
//!
//! The registration table's primary key on `(event_id, student_id)` is
//! the storage-level uniqueness constraint the engine relies on:
//! `INSERT ... ON CONFLICT DO NOTHING` makes the duplicate check and the
//! append one atomic statement across all processes.

use crate::engine::RegistrationOutcome;
use crate::store::{EventStore, RegistrationStore};
use campus_events_core::{
    Category, Error, Event, EventId, Registration, Result, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::str::FromStr;

/// PostgreSQL event and registration store.
#[derive(Clone)]
pub struct PostgresRegistry {
    pool: PgPool,
}

impl PostgresRegistry {
    /// Create a store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the events and registrations tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unavailable` if the DDL fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS events (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                location TEXT NOT NULL,
                category TEXT NOT NULL,
                fee BIGINT NOT NULL DEFAULT 0,
                brochure TEXT,
                host UUID NOT NULL,
                created_seq BIGSERIAL,
                created_at TIMESTAMPTZ NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS registrations (
                event_id UUID NOT NULL REFERENCES events(id),
                student_id UUID NOT NULL,
                registered_at TIMESTAMPTZ NOT NULL,
                teammates JSONB NOT NULL,
                created_seq BIGSERIAL,
                PRIMARY KEY (event_id, student_id)
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

fn row_to_event(row: &PgRow) -> Result<Event> {
    let category: String = row.try_get("category").map_err(unavailable)?;
    let fee: i64 = row.try_get("fee").map_err(unavailable)?;
    let date: DateTime<Utc> = row.try_get("date").map_err(unavailable)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(unavailable)?;

    Ok(Event {
        id: EventId(row.try_get("id").map_err(unavailable)?),
        title: row.try_get("title").map_err(unavailable)?,
        description: row.try_get("description").map_err(unavailable)?,
        date,
        location: row.try_get("location").map_err(unavailable)?,
        category: Category::from_str(&category)?,
        fee: u32::try_from(fee).map_err(|_| Error::Internal)?,
        brochure: row.try_get("brochure").map_err(unavailable)?,
        host: UserId(row.try_get("host").map_err(unavailable)?),
        created_at,
    })
}

fn row_to_registration(row: &PgRow) -> Result<Registration> {
    let Json(teammates): Json<Vec<String>> =
        row.try_get("teammates").map_err(unavailable)?;

    Ok(Registration {
        event_id: EventId(row.try_get("event_id").map_err(unavailable)?),
        student_id: UserId(row.try_get("student_id").map_err(unavailable)?),
        registered_at: row.try_get("registered_at").map_err(unavailable)?,
        teammates,
    })
}

impl EventStore for PostgresRegistry {
    async fn insert_event(&self, event: &Event) -> Result<Event> {
        sqlx::query(
            r"
            INSERT INTO events
                (id, title, description, date, location, category, fee,
                 brochure, host, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(event.id.0)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.category.to_string())
        .bind(i64::from(event.fee))
        .bind(&event.brochure)
        .bind(event.host.0)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(event.clone())
    }

    async fn get_event(&self, event_id: EventId) -> Result<Event> {
        let row = sqlx::query("SELECT * FROM events WHERE id = $1")
            .bind(event_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or(Error::NotFound { resource: "event" })?;

        row_to_event(&row)
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query("SELECT * FROM events ORDER BY date ASC, created_seq ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        rows.iter().map(row_to_event).collect()
    }

    async fn list_events_by_host(&self, host: UserId) -> Result<Vec<Event>> {
        let rows = sqlx::query(
            "SELECT * FROM events WHERE host = $1 ORDER BY date ASC, created_seq ASC",
        )
        .bind(host.0)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.iter().map(row_to_event).collect()
    }
}

impl RegistrationStore for PostgresRegistry {
    async fn insert_registration(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationOutcome> {
        let result = sqlx::query(
            r"
            INSERT INTO registrations (event_id, student_id, registered_at, teammates)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_id, student_id) DO NOTHING
            ",
        )
        .bind(registration.event_id.0)
        .bind(registration.student_id.0)
        .bind(registration.registered_at)
        .bind(Json(registration.teammates.clone()))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 1 {
            return Ok(RegistrationOutcome::Created {
                registration: registration.clone(),
            });
        }

        // Lost the race or retried: surface the original registration.
        let row = sqlx::query(
            "SELECT * FROM registrations WHERE event_id = $1 AND student_id = $2",
        )
        .bind(registration.event_id.0)
        .bind(registration.student_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?
        .ok_or(Error::Internal)?;

        Ok(RegistrationOutcome::AlreadyRegistered {
            registration: row_to_registration(&row)?,
        })
    }

    async fn registrations_for_event(&self, event_id: EventId) -> Result<Vec<Registration>> {
        let rows = sqlx::query(
            "SELECT * FROM registrations WHERE event_id = $1 ORDER BY created_seq ASC",
        )
        .bind(event_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.iter().map(row_to_registration).collect()
    }

    async fn events_for_student(&self, student: UserId) -> Result<Vec<EventId>> {
        let rows = sqlx::query(
            "SELECT event_id FROM registrations WHERE student_id = $1 ORDER BY created_seq ASC",
        )
        .bind(student.0)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.iter()
            .map(|row| Ok(EventId(row.try_get("event_id").map_err(unavailable)?)))
            .collect()
    }

    async fn attendee_count(&self, event_id: EventId) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM registrations WHERE event_id = $1")
            .bind(event_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;

        let count: i64 = row.try_get("count").map_err(unavailable)?;
        usize::try_from(count).map_err(|_| Error::Internal)
    }
}
