//! Assembles the full HTTP API from the ports.

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::application::handlers::{
    BookAppointmentHandler, CreateSlotHandler, DeleteAppointmentHandler, DeleteSlotHandler,
    DeleteUserHandler, GetDoctorHandler, GetUserHandler, ListDoctorAppointmentsHandler,
    ListDoctorsHandler, ListPatientAppointmentsHandler, ListSlotsHandler, LoginUserHandler,
    LogoutUserHandler, RegisterUserHandler, ResetPasswordHandler, UpdateAppointmentStatusHandler,
    UpdateDoctorHandler, UpdateSlotHandler, UpdateUserHandler,
};
use crate::ports::{
    AppointmentRepository, DoctorRepository, IdentityProvider, SessionValidator, SlotRepository,
    UserRepository,
};

use super::appointments::{appointment_routes, AppointmentHandlers};
use super::doctors::{doctor_routes, DoctorHandlers};
use super::middleware::{auth_middleware, AuthState};
use super::schedules::{schedule_routes, ScheduleHandlers};
use super::users::{user_routes, UserHandlers};

/// Everything the API needs from the outside world.
#[derive(Clone)]
pub struct ApiDependencies {
    pub users: Arc<dyn UserRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
    pub slots: Arc<dyn SlotRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: Arc<dyn SessionValidator>,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
}

/// Builds the router: `GET /` plus every endpoint under `/api/v1`.
///
/// Cross-cutting layers (CORS, tracing, timeouts) are added by the binary.
pub fn api_router(deps: ApiDependencies) -> Router {
    let users = UserHandlers::new(
        Arc::new(RegisterUserHandler::new(
            deps.identity.clone(),
            deps.users.clone(),
            deps.doctors.clone(),
        )),
        Arc::new(LoginUserHandler::new(deps.identity.clone(), deps.users.clone())),
        Arc::new(LogoutUserHandler::new(deps.identity.clone())),
        Arc::new(ResetPasswordHandler::new(deps.identity.clone())),
        Arc::new(GetUserHandler::new(deps.users.clone())),
        Arc::new(UpdateUserHandler::new(deps.users.clone())),
        Arc::new(DeleteUserHandler::new(deps.users.clone(), deps.identity.clone())),
        deps.secure_cookies,
    );

    let doctors = DoctorHandlers::new(
        Arc::new(ListDoctorsHandler::new(deps.doctors.clone())),
        Arc::new(GetDoctorHandler::new(deps.doctors.clone())),
        Arc::new(UpdateDoctorHandler::new(deps.doctors.clone())),
    );

    let schedules = ScheduleHandlers::new(
        Arc::new(CreateSlotHandler::new(deps.slots.clone())),
        Arc::new(ListSlotsHandler::new(deps.slots.clone())),
        Arc::new(UpdateSlotHandler::new(deps.slots.clone())),
        Arc::new(DeleteSlotHandler::new(deps.slots.clone())),
    );

    let appointments = AppointmentHandlers::new(
        Arc::new(BookAppointmentHandler::new(deps.appointments.clone())),
        Arc::new(ListPatientAppointmentsHandler::new(deps.appointments.clone())),
        Arc::new(ListDoctorAppointmentsHandler::new(deps.appointments.clone())),
        Arc::new(UpdateAppointmentStatusHandler::new(deps.appointments.clone())),
        Arc::new(DeleteAppointmentHandler::new(deps.appointments.clone())),
    );

    let api = Router::new()
        .nest("/users", user_routes(users))
        .nest("/doctors", doctor_routes(doctors))
        .nest("/schedules", schedule_routes(schedules))
        .nest("/appointments", appointment_routes(appointments));

    let auth_state: AuthState = deps.sessions;
    Router::new()
        .route("/", get(root))
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
}

async fn root() -> &'static str {
    "doctor_visit"
}
