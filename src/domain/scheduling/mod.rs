//! Scheduling domain module.
//!
//! Users register as doctors or patients. Doctors publish weekly availability
//! slots; patients book a slot, which reserves it.
//!
//! # Module Structure
//!
//! - `user` - Account records and roles
//! - `doctor` - Doctor records and the joined profile view
//! - `slot` - Availability slots and their status
//! - `appointment` - Appointment records and lifecycle
//! - `booking` - Slot reservation rules shared by the appointment stores
//! - `registration` - Validated sign-up requests

mod appointment;
pub mod booking;
pub mod clock_time;
mod day_of_week;
mod doctor;
mod registration;
mod slot;
mod user;

pub use appointment::{Appointment, AppointmentStatus, NewAppointment};
pub use day_of_week::DayOfWeek;
pub use doctor::{Doctor, DoctorPatch, DoctorProfile, NewDoctor};
pub use registration::{PracticeDetails, Registration};
pub use slot::{NewSlot, Slot, SlotPatch, SlotStatus};
pub use user::{NewUser, User, UserPatch, UserRole};
