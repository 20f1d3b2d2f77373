//! Availability slot handlers.

mod create_slot;
mod delete_slot;
mod list_slots;
mod update_slot;

pub use create_slot::{CreateSlotCommand, CreateSlotHandler};
pub use delete_slot::{DeleteSlotCommand, DeleteSlotHandler};
pub use list_slots::{ListSlotsHandler, ListSlotsQuery};
pub use update_slot::{UpdateSlotCommand, UpdateSlotHandler};
