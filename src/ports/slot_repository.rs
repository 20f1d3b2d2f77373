//! Availability slot repository port.

use crate::domain::foundation::{DomainError, SlotId, UserId};
use crate::domain::scheduling::{NewSlot, Slot, SlotPatch};
use async_trait::async_trait;

/// Repository port for a doctor's weekly availability slots.
///
/// Not-found outcomes are `Ok(None)`, never errors.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert a slot with a fresh id.
    ///
    /// # Errors
    ///
    /// - `DoctorNotFound` if `doctor_id` has no doctor record
    /// - `DatabaseError` on persistence failure
    async fn create(&self, slot: NewSlot) -> Result<Slot, DomainError>;

    /// All slots of one doctor, in storage order.
    async fn list_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<Slot>, DomainError>;

    async fn find_by_id(&self, id: &SlotId) -> Result<Option<Slot>, DomainError>;

    /// Apply a partial update. `updated_at` is always refreshed.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the resulting interval has `start >= end`
    async fn update(&self, id: &SlotId, patch: SlotPatch) -> Result<Option<Slot>, DomainError>;

    /// Remove a slot. Returns the removed slot.
    ///
    /// # Errors
    ///
    /// - `SlotUnavailable` if appointments still reference the slot
    async fn delete(&self, id: &SlotId) -> Result<Option<Slot>, DomainError>;

    /// Set the slot status to reserved.
    async fn mark_reserved(&self, id: &SlotId) -> Result<Option<Slot>, DomainError>;
}
