//! Seed data shared by handler tests.

use chrono::NaiveTime;

use crate::adapters::memory::InMemoryStore;
use crate::domain::foundation::UserId;
use crate::domain::scheduling::{
    DayOfWeek, Doctor, NewDoctor, NewSlot, NewUser, Slot, User, UserRole,
};
use crate::ports::{DoctorRepository, SlotRepository, UserRepository};

pub fn uid(raw: &str) -> UserId {
    UserId::new(raw).unwrap()
}

pub fn time(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").unwrap()
}

pub async fn seed_patient(store: &InMemoryStore, id: &str) -> User {
    let user = NewUser::new(
        uid(id),
        "Pat",
        "Smith",
        format!("{}@example.com", id),
        UserRole::Patient,
    )
    .unwrap();
    UserRepository::create(store, user).await.unwrap()
}

pub async fn seed_doctor(store: &InMemoryStore, id: &str) -> Doctor {
    let user = NewUser::new(
        uid(id),
        "Meredith",
        "Grey",
        format!("{}@example.com", id),
        UserRole::Doctor,
    )
    .unwrap();
    UserRepository::create(store, user).await.unwrap();
    let doctor = NewDoctor::new(uid(id), "Cardiology", "New York").unwrap();
    DoctorRepository::create(store, doctor).await.unwrap()
}

/// Monday 09:00-17:00 for the given doctor.
pub async fn seed_slot(store: &InMemoryStore, doctor_id: &str) -> Slot {
    let slot = NewSlot::new(
        uid(doctor_id),
        DayOfWeek::Monday,
        time("09:00"),
        time("17:00"),
    )
    .unwrap();
    SlotRepository::create(store, slot).await.unwrap()
}
