//! PostgreSQL implementation of AppointmentRepository.
//!
//! Booking runs in one transaction that locks the slot row with
//! `SELECT ... FOR UPDATE`, checks it, flips it to reserved and inserts the
//! appointment. A concurrent booking of the same slot blocks on the lock and
//! then sees the slot as reserved. The partial unique index
//! `appointments_active_slot_key` backs this up at the schema level.

use crate::domain::foundation::{AppointmentId, DomainError, ErrorCode, SlotId, Timestamp, UserId};
use crate::domain::scheduling::booking::{self, slot_not_found};
use crate::domain::scheduling::{Appointment, AppointmentStatus, NewAppointment, SlotStatus};
use crate::ports::AppointmentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::slot_repository::{lock_slot, write_slot_status};
use super::{decode, decode_user_id, violated_constraint};

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, doctor_id, slot_id, status, created_at, updated_at";

/// PostgreSQL implementation of the AppointmentRepository port.
pub struct PostgresAppointmentRepository {
    pool: PgPool,
    release_slot_on_cancel: bool,
}

impl PostgresAppointmentRepository {
    /// Creates the repository. With `release_slot_on_cancel` set, cancelling
    /// or deleting an active appointment makes its slot available again.
    pub fn new(pool: PgPool, release_slot_on_cancel: bool) -> Self {
        Self {
            pool,
            release_slot_on_cancel,
        }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    patient_id: String,
    doctor_id: String,
    slot_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DomainError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: AppointmentId::from_uuid(row.id),
            patient_id: decode_user_id("patient_id", row.patient_id)?,
            doctor_id: decode_user_id("doctor_id", row.doctor_id)?,
            slot_id: SlotId::from_uuid(row.slot_id),
            status: decode("status", &row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Domain error for a constraint violated while inserting an appointment.
fn booking_conflict(constraint: &str, request: &NewAppointment) -> Option<DomainError> {
    match constraint {
        "appointments_patient_id_fkey" => Some(DomainError::new(
            ErrorCode::UserNotFound,
            format!("Patient {} not found", request.patient_id),
        )),
        "appointments_active_slot_key" => Some(
            DomainError::new(
                ErrorCode::SlotUnavailable,
                format!("Slot {} is no longer available", request.slot_id),
            )
            .with_detail("slot_id", request.slot_id.to_string()),
        ),
        _ => None,
    }
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::database("Failed to commit transaction", e))
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepository {
    async fn book(&self, request: NewAppointment) -> Result<Appointment, DomainError> {
        let now = Timestamp::now();
        let mut tx = self.begin().await?;

        let slot = lock_slot(&mut tx, &request.slot_id).await?;
        booking::check_bookable(slot.as_ref(), &request)?;
        let mut slot = slot.ok_or_else(|| slot_not_found(&request.slot_id))?;
        booking::reserve(&mut slot, now)?;
        write_slot_status(&mut tx, &slot.id, slot.status, now).await?;

        let id = AppointmentId::new();
        let row: AppointmentRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO appointments (
                id, patient_id, doctor_id, slot_id, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(request.patient_id.as_str())
        .bind(request.doctor_id.as_str())
        .bind(request.slot_id.as_uuid())
        .bind(request.status.as_str())
        .bind(now.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            match violated_constraint(&e).and_then(|c| booking_conflict(c, &request)) {
                Some(err) => err,
                None => DomainError::database("Failed to insert appointment", e),
            }
        })?;

        commit(tx).await?;
        debug!(appointment_id = %id, slot_id = %request.slot_id, "Slot reserved");

        row.try_into()
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let row: Option<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch appointment", e))?;

        row.map(Appointment::try_from).transpose()
    }

    async fn list_by_patient(&self, patient_id: &UserId) -> Result<Vec<Appointment>, DomainError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE patient_id = $1 ORDER BY created_at, id"
        ))
        .bind(patient_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list patient appointments", e))?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn list_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<Appointment>, DomainError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE doctor_id = $1 ORDER BY created_at, id"
        ))
        .bind(doctor_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list doctor appointments", e))?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, DomainError> {
        let now = Timestamp::now();
        let mut tx = self.begin().await?;

        let row: Option<AppointmentRow> = sqlx::query_as(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to lock appointment", e))?;

        let Some(mut appointment) = row.map(Appointment::try_from).transpose()? else {
            return Ok(None);
        };
        let became_cancelled = appointment.transition(status, now)?;

        sqlx::query("UPDATE appointments SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(appointment.id.as_uuid())
            .bind(appointment.status.as_str())
            .bind(appointment.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to update appointment", e))?;

        if became_cancelled && self.release_slot_on_cancel {
            write_slot_status(&mut tx, &appointment.slot_id, SlotStatus::Available, now).await?;
        }

        commit(tx).await?;
        Ok(Some(appointment))
    }

    async fn delete(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let mut tx = self.begin().await?;

        let row: Option<AppointmentRow> = sqlx::query_as(&format!(
            "DELETE FROM appointments WHERE id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to delete appointment", e))?;

        let Some(removed) = row.map(Appointment::try_from).transpose()? else {
            return Ok(None);
        };

        if removed.status.is_active() && self.release_slot_on_cancel {
            write_slot_status(&mut tx, &removed.slot_id, SlotStatus::Available, Timestamp::now())
                .await?;
        }

        commit(tx).await?;
        Ok(Some(removed))
    }
}
