//! CreateSlotHandler - Command handler for publishing an availability slot.

use std::sync::Arc;

use chrono::NaiveTime;
use tracing::debug;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::{DayOfWeek, NewSlot, Slot, SlotStatus};
use crate::ports::SlotRepository;

/// Command to create a weekly slot.
#[derive(Debug, Clone)]
pub struct CreateSlotCommand {
    pub doctor_id: UserId,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Defaults to available.
    pub status: Option<SlotStatus>,
}

pub struct CreateSlotHandler {
    slots: Arc<dyn SlotRepository>,
}

impl CreateSlotHandler {
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    pub async fn handle(&self, cmd: CreateSlotCommand) -> Result<Slot, DomainError> {
        let mut new_slot = NewSlot::new(cmd.doctor_id, cmd.day_of_week, cmd.start_time, cmd.end_time)?;
        if let Some(status) = cmd.status {
            new_slot = new_slot.with_status(status);
        }

        let slot = self.slots.create(new_slot).await?;
        debug!(slot_id = %slot.id, doctor_id = %slot.doctor_id, "Slot created");
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::fixtures::{seed_doctor, time, uid};
    use crate::domain::foundation::ErrorCode;

    fn monday(doctor: &str, start: &str, end: &str) -> CreateSlotCommand {
        CreateSlotCommand {
            doctor_id: uid(doctor),
            day_of_week: DayOfWeek::Monday,
            start_time: time(start),
            end_time: time(end),
            status: None,
        }
    }

    #[tokio::test]
    async fn creates_available_slot() {
        let store = Arc::new(InMemoryStore::new());
        seed_doctor(&store, "doc-1").await;
        let handler = CreateSlotHandler::new(store.clone());

        let slot = handler.handle(monday("doc-1", "09:00", "17:00")).await.unwrap();

        assert_eq!(slot.status, SlotStatus::Available);
        assert_eq!(slot.start_time, time("09:00"));
        let listed = store.list_by_doctor(&uid("doc-1")).await.unwrap();
        assert_eq!(listed, vec![slot]);
    }

    #[tokio::test]
    async fn explicit_status_is_kept() {
        let store = Arc::new(InMemoryStore::new());
        seed_doctor(&store, "doc-1").await;
        let handler = CreateSlotHandler::new(store);
        let cmd = CreateSlotCommand {
            status: Some(SlotStatus::Reserved),
            ..monday("doc-1", "09:00", "10:00")
        };

        let slot = handler.handle(cmd).await.unwrap();

        assert_eq!(slot.status, SlotStatus::Reserved);
    }

    #[tokio::test]
    async fn inverted_interval_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        seed_doctor(&store, "doc-1").await;
        let handler = CreateSlotHandler::new(store);

        let err = handler.handle(monday("doc-1", "17:00", "09:00")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.details.get("field").map(String::as_str), Some("end_time"));
    }

    #[tokio::test]
    async fn unknown_doctor_is_not_found() {
        let handler = CreateSlotHandler::new(Arc::new(InMemoryStore::new()));

        let err = handler.handle(monday("ghost", "09:00", "10:00")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DoctorNotFound);
    }
}
