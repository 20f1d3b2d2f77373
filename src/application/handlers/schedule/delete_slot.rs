//! DeleteSlotHandler - Removes a slot that no appointment references.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{DomainError, SlotId};
use crate::domain::scheduling::booking::slot_not_found;
use crate::domain::scheduling::Slot;
use crate::ports::SlotRepository;

#[derive(Debug, Clone)]
pub struct DeleteSlotCommand {
    pub id: SlotId,
}

pub struct DeleteSlotHandler {
    slots: Arc<dyn SlotRepository>,
}

impl DeleteSlotHandler {
    pub fn new(slots: Arc<dyn SlotRepository>) -> Self {
        Self { slots }
    }

    /// # Errors
    ///
    /// - `SlotNotFound` if the slot does not exist
    /// - `SlotUnavailable` while appointments still reference it
    pub async fn handle(&self, cmd: DeleteSlotCommand) -> Result<Slot, DomainError> {
        let slot = self
            .slots
            .delete(&cmd.id)
            .await?
            .ok_or_else(|| slot_not_found(&cmd.id))?;
        debug!(slot_id = %slot.id, "Slot deleted");
        Ok(slot)
    }
}
