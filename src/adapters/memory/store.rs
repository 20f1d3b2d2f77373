use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::{
    AppointmentId, DomainError, ErrorCode, SlotId, Timestamp, UserId,
};
use crate::domain::scheduling::booking::{self, slot_not_found};
use crate::domain::scheduling::{
    Appointment, AppointmentStatus, Doctor, DoctorPatch, DoctorProfile, NewAppointment,
    NewDoctor, NewSlot, NewUser, Slot, SlotPatch, SlotStatus, User, UserPatch,
};
use crate::ports::{AppointmentRepository, DoctorRepository, SlotRepository, UserRepository};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    doctors: Vec<Doctor>,
    slots: Vec<Slot>,
    appointments: Vec<Appointment>,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<&UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(&u.uid) != except)
    }

    fn slot_mut(&mut self, id: &SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| &s.id == id)
    }

    fn slot_is_held(&self, id: &SlotId) -> bool {
        self.appointments
            .iter()
            .any(|a| &a.slot_id == id && a.status.is_active())
    }

    fn release_slot(&mut self, id: &SlotId, now: Timestamp) {
        if let Some(slot) = self.slot_mut(id) {
            booking::release(slot, now);
        }
    }
}

/// In-memory implementation of all repository ports.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
    release_slot_on_cancel: bool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            release_slot_on_cancel: true,
        }
    }

    /// Controls whether cancelling or deleting an appointment frees its slot.
    pub fn with_release_slot_on_cancel(mut self, release: bool) -> Self {
        self.release_slot_on_cancel = release;
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.lock().await;
        if state.users.contains_key(&user.uid) || state.email_taken(&user.email, None) {
            return Err(email_registered(&user.email));
        }
        let user = user.into_user(Timestamp::now());
        state.users.insert(user.uid.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_uid(&self, uid: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.state.lock().await.users.get(uid).cloned())
    }

    async fn update(&self, uid: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut state = self.state.lock().await;
        if let Some(email) = &patch.email {
            if state.email_taken(email, Some(uid)) {
                return Err(email_registered(email));
            }
        }
        Ok(state.users.get_mut(uid).map(|user| {
            patch.apply_to(user, Timestamp::now());
            user.clone()
        }))
    }

    async fn delete(&self, uid: &UserId) -> Result<Option<User>, DomainError> {
        let mut state = self.state.lock().await;
        let removed = state.users.remove(uid);
        if removed.is_some() {
            if self.release_slot_on_cancel {
                let now = Timestamp::now();
                let held: Vec<SlotId> = state
                    .appointments
                    .iter()
                    .filter(|a| &a.patient_id == uid && a.status.is_active())
                    .map(|a| a.slot_id)
                    .collect();
                for slot_id in held {
                    state.release_slot(&slot_id, now);
                }
            }
            state.doctors.retain(|d| &d.user_uid != uid);
            state
                .appointments
                .retain(|a| &a.patient_id != uid && &a.doctor_id != uid);
            state.slots.retain(|s| &s.doctor_id != uid);
        }
        Ok(removed)
    }
}

#[async_trait]
impl DoctorRepository for InMemoryStore {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor, DomainError> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&doctor.user_uid) {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User {} not found", doctor.user_uid),
            ));
        }
        if state.doctors.iter().any(|d| d.user_uid == doctor.user_uid) {
            return Err(DomainError::new(
                ErrorCode::DoctorProfileExists,
                format!("User {} already has a doctor profile", doctor.user_uid),
            ));
        }
        let doctor = doctor.into_doctor(Timestamp::now());
        state.doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn find_by_user_uid(&self, uid: &UserId) -> Result<Option<Doctor>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.doctors.iter().find(|d| &d.user_uid == uid).cloned())
    }

    async fn update(
        &self,
        uid: &UserId,
        patch: DoctorPatch,
    ) -> Result<Option<Doctor>, DomainError> {
        let mut state = self.state.lock().await;
        Ok(state
            .doctors
            .iter_mut()
            .find(|d| &d.user_uid == uid)
            .map(|doctor| {
                patch.apply_to(doctor, Timestamp::now());
                doctor.clone()
            }))
    }

    async fn find_all_profiles(&self) -> Result<Vec<DoctorProfile>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .doctors
            .iter()
            .filter_map(|d| {
                state
                    .users
                    .get(&d.user_uid)
                    .map(|u| DoctorProfile::from_parts(u, d))
            })
            .collect())
    }

    async fn find_profile(&self, uid: &UserId) -> Result<Option<DoctorProfile>, DomainError> {
        let state = self.state.lock().await;
        let doctor = state.doctors.iter().find(|d| &d.user_uid == uid);
        Ok(doctor
            .zip(state.users.get(uid))
            .map(|(d, u)| DoctorProfile::from_parts(u, d)))
    }
}

#[async_trait]
impl SlotRepository for InMemoryStore {
    async fn create(&self, slot: NewSlot) -> Result<Slot, DomainError> {
        let mut state = self.state.lock().await;
        if !state.doctors.iter().any(|d| d.user_uid == slot.doctor_id) {
            return Err(doctor_not_found(&slot.doctor_id));
        }
        let slot = slot.into_slot(SlotId::new(), Timestamp::now());
        state.slots.push(slot.clone());
        Ok(slot)
    }

    async fn list_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<Slot>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .slots
            .iter()
            .filter(|s| &s.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.slots.iter().find(|s| &s.id == id).cloned())
    }

    async fn update(&self, id: &SlotId, patch: SlotPatch) -> Result<Option<Slot>, DomainError> {
        let mut state = self.state.lock().await;
        let held = state.slot_is_held(id);
        let Some(slot) = state.slot_mut(id) else {
            return Ok(None);
        };
        booking::check_status_patch(slot, &patch, held)?;
        let next = slot.patched(&patch, Timestamp::now())?;
        *slot = next.clone();
        Ok(Some(next))
    }

    async fn delete(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        let mut state = self.state.lock().await;
        if state.appointments.iter().any(|a| &a.slot_id == id) {
            return Err(slot_referenced(id));
        }
        let position = state.slots.iter().position(|s| &s.id == id);
        Ok(position.map(|i| state.slots.remove(i)))
    }

    async fn mark_reserved(&self, id: &SlotId) -> Result<Option<Slot>, DomainError> {
        SlotRepository::update(self, id, SlotPatch::status(SlotStatus::Reserved)).await
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn book(&self, request: NewAppointment) -> Result<Appointment, DomainError> {
        let mut state = self.state.lock().await;
        let now = Timestamp::now();

        booking::check_bookable(
            state.slots.iter().find(|s| s.id == request.slot_id),
            &request,
        )?;
        if !state.users.contains_key(&request.patient_id) {
            return Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("Patient {} not found", request.patient_id),
            ));
        }

        let slot = state
            .slot_mut(&request.slot_id)
            .ok_or_else(|| slot_not_found(&request.slot_id))?;
        booking::reserve(slot, now)?;

        let appointment = request.into_appointment(AppointmentId::new(), now);
        state.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.appointments.iter().find(|a| &a.id == id).cloned())
    }

    async fn list_by_patient(&self, patient_id: &UserId) -> Result<Vec<Appointment>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .appointments
            .iter()
            .filter(|a| &a.patient_id == patient_id)
            .cloned()
            .collect())
    }

    async fn list_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<Appointment>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .appointments
            .iter()
            .filter(|a| &a.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, DomainError> {
        let mut state = self.state.lock().await;
        let now = Timestamp::now();
        let Some(appointment) = state.appointments.iter_mut().find(|a| &a.id == id) else {
            return Ok(None);
        };

        let became_cancelled = appointment.transition(status, now)?;
        let updated = appointment.clone();

        if became_cancelled && self.release_slot_on_cancel {
            state.release_slot(&updated.slot_id, now);
        }
        Ok(Some(updated))
    }

    async fn delete(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let mut state = self.state.lock().await;
        let Some(position) = state.appointments.iter().position(|a| &a.id == id) else {
            return Ok(None);
        };

        let removed = state.appointments.remove(position);
        if removed.status.is_active() && self.release_slot_on_cancel {
            state.release_slot(&removed.slot_id, Timestamp::now());
        }
        Ok(Some(removed))
    }
}

fn email_registered(email: &str) -> DomainError {
    DomainError::new(
        ErrorCode::EmailAlreadyRegistered,
        format!("Email {} is already registered", email),
    )
}

fn doctor_not_found(uid: &UserId) -> DomainError {
    DomainError::new(ErrorCode::DoctorNotFound, format!("Doctor {} not found", uid))
}

fn slot_referenced(id: &SlotId) -> DomainError {
    DomainError::new(
        ErrorCode::SlotUnavailable,
        format!("Slot {} is referenced by appointments", id),
    )
    .with_detail("slot_id", id.to_string())
}
