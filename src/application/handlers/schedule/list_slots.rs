//! ListSlotsHandler - Query handler for a doctor's weekly schedule.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::Slot;
use crate::ports::SlotRepository;

#[derive(Debug, Clone)]
pub struct ListSlotsQuery {
    pub doctor_id: UserId,
}

pub struct ListSlotsHandler {
    slots: Arc<dyn SlotRepository>,
}

impl ListSlotsHandler {
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    pub async fn handle(&self, query: ListSlotsQuery) -> Result<Vec<Slot>, DomainError> {
        self.slots.list_by_doctor(&query.doctor_id).await
    }
}
