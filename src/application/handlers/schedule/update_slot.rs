//! UpdateSlotHandler - Partial update of a slot.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SlotId};
use crate::domain::scheduling::booking::slot_not_found;
use crate::domain::scheduling::{Slot, SlotPatch};
use crate::ports::SlotRepository;

#[derive(Debug, Clone)]
pub struct UpdateSlotCommand {
    pub id: SlotId,
    pub patch: SlotPatch,
}

pub struct UpdateSlotHandler {
    slots: Arc<dyn SlotRepository>,
}

impl UpdateSlotHandler {
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    /// The resulting interval is validated by the store against the
    /// current row, so a patch touching only one end is still checked.
    pub async fn handle(&self, cmd: UpdateSlotCommand) -> Result<Slot, DomainError> {
        self.slots
            .update(&cmd.id, cmd.patch)
            .await?
            .ok_or_else(|| slot_not_found(&cmd.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::fixtures::{seed_doctor, seed_patient, seed_slot, time, uid};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::scheduling::{DayOfWeek, NewAppointment, SlotStatus};
    use crate::ports::AppointmentRepository;

    #[tokio::test]
    async fn moves_slot_to_another_day() {
        let store = Arc::new(InMemoryStore::new());
        seed_doctor(&store, "doc-1").await;
        let slot = seed_slot(&store, "doc-1").await;
        let handler = UpdateSlotHandler::new(store);

        let updated = handler
            .handle(UpdateSlotCommand {
                id: slot.id,
                patch: SlotPatch {
                    day_of_week: Some(DayOfWeek::Friday),
                    end_time: Some(time("12:00")),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.day_of_week, DayOfWeek::Friday);
        assert_eq!(updated.start_time, slot.start_time);
        assert_eq!(updated.end_time, time("12:00"));
        assert_eq!(updated.status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn end_before_existing_start_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        seed_doctor(&store, "doc-1").await;
        let slot = seed_slot(&store, "doc-1").await;
        let handler = UpdateSlotHandler::new(store);

        let err = handler
            .handle(UpdateSlotCommand {
                id: slot.id,
                patch: SlotPatch {
                    end_time: Some(time("08:00")),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();

        assert!(err.code.is_validation());
    }

    #[tokio::test]
    async fn booked_slot_cannot_be_marked_available() {
        let store = Arc::new(InMemoryStore::new());
        seed_doctor(&store, "doc-1").await;
        seed_patient(&store, "pat-1").await;
        let slot = seed_slot(&store, "doc-1").await;
        store
            .book(NewAppointment::new(uid("pat-1"), uid("doc-1"), slot.id))
            .await
            .unwrap();
        let handler = UpdateSlotHandler::new(store.clone());

        let err = handler
            .handle(UpdateSlotCommand {
                id: slot.id,
                patch: SlotPatch::status(SlotStatus::Available),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::SlotUnavailable);
        let second = store
            .book(NewAppointment::new(uid("pat-1"), uid("doc-1"), slot.id))
            .await
            .unwrap_err();
        assert_eq!(second.code, ErrorCode::SlotUnavailable);
    }

    #[tokio::test]
    async fn booked_slot_can_still_be_retimed() {
        let store = Arc::new(InMemoryStore::new());
        seed_doctor(&store, "doc-1").await;
        seed_patient(&store, "pat-1").await;
        let slot = seed_slot(&store, "doc-1").await;
        store
            .book(NewAppointment::new(uid("pat-1"), uid("doc-1"), slot.id))
            .await
            .unwrap();
        let handler = UpdateSlotHandler::new(store);

        let updated = handler
            .handle(UpdateSlotCommand {
                id: slot.id,
                patch: SlotPatch {
                    end_time: Some(time("12:00")),
                    status: Some(SlotStatus::Reserved),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.end_time, time("12:00"));
        assert_eq!(updated.status, SlotStatus::Reserved);
    }

    #[tokio::test]
    async fn unknown_slot_is_not_found() {
        let handler = UpdateSlotHandler::new(Arc::new(InMemoryStore::new()));

        let err = handler
            .handle(UpdateSlotCommand {
                id: SlotId::new(),
                patch: SlotPatch::status(SlotStatus::Reserved),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::SlotNotFound);
    }
}
