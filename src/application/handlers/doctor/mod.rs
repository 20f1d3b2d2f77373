//! Doctor directory handlers.

mod get_doctor;
mod list_doctors;
mod update_doctor;

pub use get_doctor::{GetDoctorHandler, GetDoctorQuery};
pub use list_doctors::{ListDoctorsHandler, ListDoctorsQuery};
pub use update_doctor::{UpdateDoctorCommand, UpdateDoctorHandler};
