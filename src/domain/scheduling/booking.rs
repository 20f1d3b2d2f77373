//! Rules for reserving a slot on behalf of a patient.
//!
//! Both appointment stores run these checks while holding the slot exclusively
//! (row lock in PostgreSQL, the store mutex in memory), so a passing check is
//! immediately followed by the reservation without interleaving.

use crate::domain::foundation::{DomainError, ErrorCode, SlotId, StateMachine, Timestamp};

use super::{NewAppointment, Slot, SlotPatch, SlotStatus};

/// Verifies that `request` may reserve `slot`.
///
/// # Errors
///
/// - `SLOT_NOT_FOUND` when no slot was found for the request
/// - `VALIDATION_FAILED` when the slot belongs to another doctor
/// - `SLOT_UNAVAILABLE` when the slot is not available
pub fn check_bookable(slot: Option<&Slot>, request: &NewAppointment) -> Result<(), DomainError> {
    let slot = slot.ok_or_else(|| slot_not_found(&request.slot_id))?;

    if slot.doctor_id != request.doctor_id {
        return Err(DomainError::validation(
            "doctor_id",
            format!("Slot {} does not belong to doctor {}", slot.id, request.doctor_id),
        ));
    }

    if !slot.status.is_bookable() {
        return Err(DomainError::new(
            ErrorCode::SlotUnavailable,
            format!("Slot {} is no longer available", slot.id),
        )
        .with_detail("slot_id", slot.id.to_string()));
    }

    Ok(())
}

/// Verifies that `patch` does not move the status of a slot an active
/// appointment still holds. Setting the current status again is allowed.
///
/// # Errors
///
/// - `SLOT_UNAVAILABLE` when the status would change under a live booking
pub fn check_status_patch(slot: &Slot, patch: &SlotPatch, held: bool) -> Result<(), DomainError> {
    match patch.status {
        Some(status) if held && status != slot.status => Err(DomainError::new(
            ErrorCode::SlotUnavailable,
            format!("Slot {} is held by an active appointment", slot.id),
        )
        .with_detail("slot_id", slot.id.to_string())),
        _ => Ok(()),
    }
}

/// Flips a checked slot to reserved.
pub fn reserve(slot: &mut Slot, now: Timestamp) -> Result<(), DomainError> {
    slot.status = slot.status.transition_to(SlotStatus::Reserved)?;
    slot.updated_at = now;
    Ok(())
}

/// Hands a reserved slot back to the pool.
pub fn release(slot: &mut Slot, now: Timestamp) {
    slot.status = SlotStatus::Available;
    slot.updated_at = now;
}

pub fn slot_not_found(id: &SlotId) -> DomainError {
    DomainError::new(ErrorCode::SlotNotFound, format!("Slot {} not found", id))
        .with_detail("slot_id", id.to_string())
}
