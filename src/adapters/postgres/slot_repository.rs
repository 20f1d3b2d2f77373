//! PostgreSQL implementation of SlotRepository.

use crate::domain::foundation::{DomainError, ErrorCode, SlotId, Timestamp, UserId};
use crate::domain::scheduling::booking;
use crate::domain::scheduling::{NewSlot, Slot, SlotPatch, SlotStatus};
use crate::ports::SlotRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{decode, decode_user_id, violated_constraint};

pub(super) const SLOT_COLUMNS: &str =
    "id, doctor_id, day_of_week, start_time, end_time, status, created_at, updated_at";

/// PostgreSQL implementation of the SlotRepository port.
pub struct PostgresSlotRepository {
    pool: PgPool,
}

impl PostgresSlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SlotRow {
    id: Uuid,
    doctor_id: String,
    day_of_week: String,
    start_time: NaiveTime,
    end_time: NaiveTime,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SlotRow> for Slot {
    type Error = DomainError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        Ok(Slot {
            id: SlotId::from_uuid(row.id),
            doctor_id: decode_user_id("doctor_id", row.doctor_id)?,
            day_of_week: decode("day_of_week", &row.day_of_week)?,
            start_time: row.start_time,
            end_time: row.end_time,
            status: decode("status", &row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Domain error for a constraint violated while inserting a slot.
fn insert_conflict(constraint: &str, doctor_id: &UserId) -> Option<DomainError> {
    match constraint {
        "slots_doctor_id_fkey" => Some(DomainError::new(
            ErrorCode::DoctorNotFound,
            format!("Doctor {} not found", doctor_id),
        )),
        _ => None,
    }
}

/// Domain error for a constraint violated while deleting a slot.
fn delete_conflict(constraint: &str, id: &SlotId) -> Option<DomainError> {
    match constraint {
        "appointments_slot_id_fkey" => Some(
            DomainError::new(
                ErrorCode::SlotUnavailable,
                format!("Slot {} is referenced by appointments", id),
            )
            .with_detail("slot_id", id.to_string()),
        ),
        _ => None,
    }
}

/// Loads a slot and locks its row until the transaction ends.
pub(super) async fn lock_slot(
    tx: &mut Transaction<'_, Postgres>,
    id: &SlotId,
) -> Result<Option<Slot>, DomainError> {
    let row: Option<SlotRow> = sqlx::query_as(&format!(
        "SELECT {SLOT_COLUMNS} FROM slots WHERE id = $1 FOR UPDATE"
    ))
    .bind(id.as_uuid())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| DomainError::database("Failed to lock slot", e))?;

    row.map(Slot::try_from).transpose()
}

/// Writes a slot's status inside an open transaction.
pub(super) async fn write_slot_status(
    tx: &mut Transaction<'_, Postgres>,
    id: &SlotId,
    status: SlotStatus,
    now: Timestamp,
) -> Result<(), DomainError> {
    sqlx::query("UPDATE slots SET status = $2, updated_at = $3 WHERE id = $1")
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(now.as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::database("Failed to update slot status", e))?;
    Ok(())
}

#[async_trait]
impl SlotRepository for PostgresSlotRepository {
    async fn create(&self, slot: NewSlot) -> Result<Slot, DomainError> {
        let id = SlotId::new();
        let now = Timestamp::now();
        let row: SlotRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO slots (
                id, doctor_id, day_of_week, start_time, end_time, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {SLOT_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(slot.doctor_id.as_str())
        .bind(slot.day_of_week.as_str())
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.status.as_str())
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            match violated_constraint(&e).and_then(|c| insert_conflict(c, &slot.doctor_id)) {
                Some(err) => err,
                None => DomainError::database("Failed to insert slot", e),
            }
        })?;

        row.try_into()
    }

    async fn list_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<Slot>, DomainError> {
        let rows: Vec<SlotRow> = sqlx::query_as(&format!(
            "SELECT {SLOT_COLUMNS} FROM slots WHERE doctor_id = $1 ORDER BY created_at, id"
        ))
        .bind(doctor_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list slots", e))?;

        rows.into_iter().map(Slot::try_from).collect()
    }

    async fn find_by_id(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        let row: Option<SlotRow> =
            sqlx::query_as(&format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch slot", e))?;

        row.map(Slot::try_from).transpose()
    }

    async fn update(&self, id: &SlotId, patch: SlotPatch) -> Result<Option<Slot>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database("Failed to begin transaction", e)
        })?;

        let Some(current) = lock_slot(&mut tx, id).await? else {
            return Ok(None);
        };
        if patch.status.is_some() {
            let held: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM appointments WHERE slot_id = $1 AND status <> 'cancelled')",
            )
            .bind(id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to check slot appointments", e))?;
            booking::check_status_patch(&current, &patch, held)?;
        }
        let next = current.patched(&patch, Timestamp::now())?;

        sqlx::query(
            r#"
            UPDATE slots SET
                day_of_week = $2,
                start_time = $3,
                end_time = $4,
                status = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(next.id.as_uuid())
        .bind(next.day_of_week.as_str())
        .bind(next.start_time)
        .bind(next.end_time)
        .bind(next.status.as_str())
        .bind(next.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to update slot", e))?;

        tx.commit().await.map_err(|e| {
            DomainError::database("Failed to commit transaction", e)
        })?;

        Ok(Some(next))
    }

    async fn delete(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        let row: Option<SlotRow> = sqlx::query_as(&format!(
            "DELETE FROM slots WHERE id = $1 RETURNING {SLOT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e).and_then(|c| delete_conflict(c, id)) {
            Some(err) => err,
            None => DomainError::database("Failed to delete slot", e),
        })?;

        row.map(Slot::try_from).transpose()
    }

    async fn mark_reserved(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        self.update(id, SlotPatch::status(SlotStatus::Reserved)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> SlotRow {
        let now = Utc::now();
        SlotRow {
            id: Uuid::new_v4(),
            doctor_id: "doc-1".to_string(),
            day_of_week: "monday".to_string(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_to_slot() {
        let slot = Slot::try_from(row("reserved")).unwrap();
        assert_eq!(slot.status, SlotStatus::Reserved);
        assert_eq!(slot.doctor_id.as_str(), "doc-1");
    }

    #[test]
    fn row_with_unknown_status_is_a_database_error() {
        let err = Slot::try_from(row("booked")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn row_with_unknown_day_is_a_database_error() {
        let mut bad = row("available");
        bad.day_of_week = "funday".to_string();
        assert_eq!(Slot::try_from(bad).unwrap_err().code, ErrorCode::DatabaseError);
    }

    #[test]
    fn missing_doctor_maps_to_not_found() {
        let doctor = UserId::new("doc-9").unwrap();
        let err = insert_conflict("slots_doctor_id_fkey", &doctor).unwrap();
        assert_eq!(err.code, ErrorCode::DoctorNotFound);
        assert!(insert_conflict("slots_pkey", &doctor).is_none());
    }

    #[test]
    fn referenced_slot_maps_to_unavailable() {
        let id = SlotId::new();
        let err = delete_conflict("appointments_slot_id_fkey", &id).unwrap();
        assert_eq!(err.code, ErrorCode::SlotUnavailable);
        assert!(delete_conflict("slots_time_range_check", &id).is_none());
    }
}
