//! Integration tests for the HTTP API.
//!
//! These tests drive the full router built by `api_router` with the
//! in-memory store and the mock identity provider:
//! 1. Accounts are created and signed in through the API
//! 2. The session travels as the `access_token` cookie or a Bearer header
//! 3. Booking, conflicts and cancellation are observed through the API
//! 4. Every failure uses the `{code, message, details}` error body

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use doctor_visit::adapters::auth::MockIdentityProvider;
use doctor_visit::adapters::http::{api_router, ApiDependencies};
use doctor_visit::adapters::memory::InMemoryStore;
use doctor_visit::domain::foundation::{IdentityError, UserId};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    identity: MockIdentityProvider,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let identity = MockIdentityProvider::new();
        let router = api_router(ApiDependencies {
            users: store.clone(),
            doctors: store.clone(),
            slots: store.clone(),
            appointments: store,
            identity: Arc::new(identity.clone()),
            sessions: Arc::new(identity.session_validator()),
            secure_cookies: false,
        });
        Self { router, identity }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Registers an account and signs in, returning `(uid, token)`.
    async fn sign_up(&self, body: Value) -> (String, String) {
        let email = body["email"].as_str().unwrap().to_string();
        let password = body["password"].as_str().unwrap().to_string();

        let registered = self
            .call(Method::POST, "/api/v1/users/register", None, Some(body))
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let login = self
            .call(
                Method::POST,
                "/api/v1/users/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);

        let uid = login.body["user"]["uid"].as_str().unwrap().to_string();
        (uid, session_cookie_token(&login.headers).unwrap())
    }

    async fn sign_up_doctor(&self, email: &str) -> (String, String) {
        self.sign_up(json!({
            "email": email,
            "password": "secret-pw",
            "first_name": "Meredith",
            "last_name": "Grey",
            "role": "doctor",
            "specialty": "Cardiology",
            "location": "New York"
        }))
        .await
    }

    async fn sign_up_patient(&self, email: &str) -> (String, String) {
        self.sign_up(json!({
            "email": email,
            "password": "secret-pw",
            "first_name": "Alex",
            "last_name": "Karev",
            "user_type": "patient"
        }))
        .await
    }

    async fn monday_slot(&self, token: &str) -> String {
        let created = self
            .call(
                Method::POST,
                "/api/v1/schedules/create",
                Some(token),
                Some(json!({
                    "day_of_week": "Monday",
                    "start_time": "09:00",
                    "end_time": "17:00"
                })),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
        created.body["id"].as_str().unwrap().to_string()
    }
}

fn session_cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix("access_token="))
        .and_then(|rest| rest.split(';').next())
        .map(str::to_string)
}

fn assert_error(response: &TestResponse, status: StatusCode, code: &str) {
    assert_eq!(response.status, status, "{}", response.body);
    assert_eq!(response.body["code"], code, "{}", response.body);
    assert!(response.body["message"].is_string());
}

// =============================================================================
// Root and directory
// =============================================================================

#[tokio::test]
async fn root_names_the_service() {
    let app = TestApp::new();

    let response = app.call(Method::GET, "/", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, Value::String("doctor_visit".to_string()));
}

#[tokio::test]
async fn doctor_directory_lists_registered_doctors() {
    let app = TestApp::new();
    let (doctor_uid, _) = app.sign_up_doctor("grey@example.com").await;
    app.sign_up_patient("karev@example.com").await;

    let list = app.call(Method::GET, "/api/v1/doctors", None, None).await;
    assert_eq!(list.status, StatusCode::OK);
    let doctors = list.body["doctors"].as_array().unwrap();
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["uid"], doctor_uid.as_str());
    assert_eq!(doctors[0]["specialty"], "Cardiology");
    assert_eq!(doctors[0]["location"], "New York");

    let one = app
        .call(Method::GET, &format!("/api/v1/doctors/{}", doctor_uid), None, None)
        .await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["first_name"], "Meredith");
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let app = TestApp::new();

    let response = app.call(Method::GET, "/api/v1/doctors/nobody", None, None).await;

    assert_error(&response, StatusCode::NOT_FOUND, "DOCTOR_NOT_FOUND");
}

// =============================================================================
// Booking flow
// =============================================================================

#[tokio::test]
async fn booking_reserves_slot_and_second_booking_conflicts() {
    let app = TestApp::new();
    let (doctor_uid, doctor_token) = app.sign_up_doctor("grey@example.com").await;
    let slot_id = app.monday_slot(&doctor_token).await;
    let (patient_uid, patient_token) = app.sign_up_patient("karev@example.com").await;

    let booked = app
        .call(
            Method::POST,
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({ "doctor_id": doctor_uid, "slot_id": slot_id })),
        )
        .await;
    assert_eq!(booked.status, StatusCode::CREATED, "{}", booked.body);
    assert_eq!(booked.body["status"], "pending");
    assert_eq!(booked.body["patient_id"], patient_uid.as_str());
    assert_eq!(booked.body["slot_id"], slot_id.as_str());

    let slots = app
        .call(Method::GET, &format!("/api/v1/schedules/{}", doctor_uid), None, None)
        .await;
    assert_eq!(slots.body[0]["status"], "reserved");
    assert_eq!(slots.body[0]["day_of_week"], "monday");
    assert_eq!(slots.body[0]["start_time"], "09:00");

    let (_, other_token) = app.sign_up_patient("yang@example.com").await;
    let second = app
        .call(
            Method::POST,
            "/api/v1/appointments",
            Some(&other_token),
            Some(json!({ "doctor_id": doctor_uid, "schedule_id": slot_id })),
        )
        .await;
    assert_error(&second, StatusCode::CONFLICT, "SLOT_UNAVAILABLE");

    let for_doctor = app
        .call(
            Method::GET,
            &format!("/api/v1/appointments/doctor/{}", doctor_uid),
            Some(&doctor_token),
            None,
        )
        .await;
    assert_eq!(for_doctor.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cancelling_makes_the_slot_bookable_again() {
    let app = TestApp::new();
    let (doctor_uid, doctor_token) = app.sign_up_doctor("grey@example.com").await;
    let slot_id = app.monday_slot(&doctor_token).await;
    let (patient_uid, patient_token) = app.sign_up_patient("karev@example.com").await;
    let booked = app
        .call(
            Method::POST,
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({ "doctor_id": doctor_uid, "slot_id": slot_id })),
        )
        .await;
    let appointment_id = booked.body["id"].as_str().unwrap().to_string();

    let cancelled = app
        .call(
            Method::PATCH,
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({ "id": appointment_id, "status": "cancelled" })),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK, "{}", cancelled.body);
    assert_eq!(cancelled.body["status"], "cancelled");

    let confirm_again = app
        .call(
            Method::PATCH,
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({ "id": appointment_id, "status": "confirmed" })),
        )
        .await;
    assert_error(&confirm_again, StatusCode::CONFLICT, "INVALID_STATE_TRANSITION");

    let rebooked = app
        .call(
            Method::POST,
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({ "doctor_id": doctor_uid, "slot_id": slot_id })),
        )
        .await;
    assert_eq!(rebooked.status, StatusCode::CREATED, "{}", rebooked.body);

    let mine = app
        .call(
            Method::GET,
            &format!("/api/v1/appointments/patient/{}", patient_uid),
            Some(&patient_token),
            None,
        )
        .await;
    assert_eq!(mine.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_appointment_then_slot() {
    let app = TestApp::new();
    let (doctor_uid, doctor_token) = app.sign_up_doctor("grey@example.com").await;
    let slot_id = app.monday_slot(&doctor_token).await;
    let (_, patient_token) = app.sign_up_patient("karev@example.com").await;
    let booked = app
        .call(
            Method::POST,
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({ "doctor_id": doctor_uid, "slot_id": slot_id })),
        )
        .await;
    let appointment_id = booked.body["id"].as_str().unwrap().to_string();
    let slot_uri = format!("/api/v1/schedules/schedule/{}", slot_id);

    let blocked = app.call(Method::DELETE, &slot_uri, Some(&doctor_token), None).await;
    assert_error(&blocked, StatusCode::CONFLICT, "SLOT_UNAVAILABLE");

    let removed = app
        .call(
            Method::DELETE,
            &format!("/api/v1/appointments/{}", appointment_id),
            Some(&patient_token),
            None,
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let again = app
        .call(
            Method::DELETE,
            &format!("/api/v1/appointments/{}", appointment_id),
            Some(&patient_token),
            None,
        )
        .await;
    assert_error(&again, StatusCode::NOT_FOUND, "APPOINTMENT_NOT_FOUND");

    let slot_removed = app.call(Method::DELETE, &slot_uri, Some(&doctor_token), None).await;
    assert_eq!(slot_removed.status, StatusCode::OK);
}

#[tokio::test]
async fn slot_update_rejects_inverted_interval() {
    let app = TestApp::new();
    let (_, doctor_token) = app.sign_up_doctor("grey@example.com").await;
    let slot_id = app.monday_slot(&doctor_token).await;
    let uri = format!("/api/v1/schedules/schedule/{}", slot_id);

    let moved = app
        .call(
            Method::PUT,
            &uri,
            Some(&doctor_token),
            Some(json!({ "day_of_week": "Tuesday", "end_time": "12:00" })),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{}", moved.body);
    assert_eq!(moved.body["day_of_week"], "tuesday");
    assert_eq!(moved.body["end_time"], "12:00");

    let inverted = app
        .call(
            Method::PUT,
            &uri,
            Some(&doctor_token),
            Some(json!({ "start_time": "13:00" })),
        )
        .await;
    assert_eq!(inverted.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn booked_slot_cannot_be_reopened() {
    let app = TestApp::new();
    let (doctor_uid, doctor_token) = app.sign_up_doctor("grey@example.com").await;
    let slot_id = app.monday_slot(&doctor_token).await;
    let (_, patient_token) = app.sign_up_patient("karev@example.com").await;
    let booked = app
        .call(
            Method::POST,
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({ "doctor_id": doctor_uid, "slot_id": slot_id })),
        )
        .await;
    assert_eq!(booked.status, StatusCode::CREATED, "{}", booked.body);

    let reopened = app
        .call(
            Method::PUT,
            &format!("/api/v1/schedules/schedule/{}", slot_id),
            Some(&doctor_token),
            Some(json!({ "status": "available" })),
        )
        .await;
    assert_error(&reopened, StatusCode::CONFLICT, "SLOT_UNAVAILABLE");

    let (_, other_token) = app.sign_up_patient("yang@example.com").await;
    let second = app
        .call(
            Method::POST,
            "/api/v1/appointments",
            Some(&other_token),
            Some(json!({ "doctor_id": doctor_uid, "slot_id": slot_id })),
        )
        .await;
    assert_error(&second, StatusCode::CONFLICT, "SLOT_UNAVAILABLE");

    let slots = app
        .call(Method::GET, &format!("/api/v1/schedules/{}", doctor_uid), None, None)
        .await;
    assert_eq!(slots.body[0]["status"], "reserved");
}

#[tokio::test]
async fn malformed_ids_are_invalid_format() {
    let app = TestApp::new();
    let (_, token) = app.sign_up_doctor("grey@example.com").await;

    let response = app
        .call(
            Method::DELETE,
            "/api/v1/schedules/schedule/not-a-uuid",
            Some(&token),
            None,
        )
        .await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "INVALID_FORMAT");
    assert_eq!(response.body["details"]["field"], "id");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = TestApp::new();

    for (method, uri) in [
        (Method::GET, "/api/v1/users/uid-1"),
        (Method::POST, "/api/v1/schedules/create"),
        (Method::GET, "/api/v1/appointments/patient/uid-1"),
        (Method::DELETE, "/api/v1/appointments/550e8400-e29b-41d4-a716-446655440000"),
    ] {
        let response = app.call(method, uri, None, Some(json!({}))).await;
        assert_error(&response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn login_cookie_authenticates_later_requests() {
    let app = TestApp::new();
    let (uid, token) = app.sign_up_patient("karev@example.com").await;

    let request = Request::builder()
        .uri(format!("/api/v1/users/{}", uid))
        .header(header::COOKIE, format!("access_token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "karev@example.com");
    assert_eq!(response.body["role"], "patient");
}

#[tokio::test]
async fn login_sets_http_only_cookie() {
    let app = TestApp::new();
    app.sign_up_patient("karev@example.com").await;

    let login = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(json!({ "email": "karev@example.com", "password": "secret-pw" })),
        )
        .await;

    let cookie = login.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(login.body["message"], "User logged in successfully!");
    assert_eq!(login.body["user"]["email"], "karev@example.com");
}

#[tokio::test]
async fn logout_clears_cookie_and_ends_session() {
    let app = TestApp::new();
    let (uid, token) = app.sign_up_patient("karev@example.com").await;

    let logout = app
        .call(Method::POST, "/api/v1/users/logout", Some(&token), None)
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    let cookie = logout.headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));

    let after = app
        .call(Method::GET, &format!("/api/v1/users/{}", uid), Some(&token), None)
        .await;
    assert_error(&after, StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let app = TestApp::new();

    let response = app.call(Method::POST, "/api/v1/users/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let app = TestApp::new();
    app.sign_up_patient("karev@example.com").await;

    let response = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(json!({ "email": "karev@example.com", "password": "nope-nope" })),
        )
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS");
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn registration_sends_verification_email() {
    let app = TestApp::new();

    let response = app
        .call(
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({
                "email": "grey@example.com",
                "password": "secret-pw",
                "first_name": "Meredith",
                "last_name": "Grey",
                "role": "doctor",
                "specialty": "Cardiology",
                "location": "New York"
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"]["role"], "doctor");
    assert_eq!(response.body["doctor"]["specialty"], "Cardiology");
    assert_eq!(app.identity.verification_emails(), vec!["grey@example.com"]);
}

#[tokio::test]
async fn doctor_registration_requires_practice_details() {
    let app = TestApp::new();

    let response = app
        .call(
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({
                "email": "grey@example.com",
                "password": "secret-pw",
                "first_name": "Meredith",
                "last_name": "Grey",
                "role": "doctor",
                "location": "New York"
            })),
        )
        .await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_FIELD");
    assert_eq!(response.body["details"]["field"], "specialty");
    assert_eq!(app.identity.account_count(), 0);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::new();
    app.sign_up_patient("karev@example.com").await;

    let response = app
        .call(
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({
                "email": "karev@example.com",
                "password": "secret-pw",
                "first_name": "Alex",
                "last_name": "Karev",
                "role": "patient"
            })),
        )
        .await;

    assert_error(&response, StatusCode::CONFLICT, "EMAIL_ALREADY_REGISTERED");
}

#[tokio::test]
async fn malformed_body_uses_error_envelope() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/users/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_error(&response, StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED");
}

#[tokio::test]
async fn reset_password_does_not_reveal_unknown_emails() {
    let app = TestApp::new();
    app.sign_up_patient("karev@example.com").await;

    for email in ["karev@example.com", "ghost@example.com"] {
        let response = app
            .call(
                Method::POST,
                "/api/v1/users/reset-password",
                None,
                Some(json!({ "email": email })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(app.identity.reset_emails(), vec!["karev@example.com"]);
}

#[tokio::test]
async fn user_update_changes_names() {
    let app = TestApp::new();
    let (uid, token) = app.sign_up_patient("karev@example.com").await;

    let response = app
        .call(
            Method::PUT,
            &format!("/api/v1/users/{}", uid),
            Some(&token),
            Some(json!({ "last_name": "Karev-Stevens" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["last_name"], "Karev-Stevens");
    assert_eq!(response.body["first_name"], "Alex");
}

#[tokio::test]
async fn doctor_update_changes_practice() {
    let app = TestApp::new();
    let (uid, token) = app.sign_up_doctor("grey@example.com").await;

    let response = app
        .call(
            Method::PUT,
            &format!("/api/v1/doctors/{}", uid),
            Some(&token),
            Some(json!({ "location": "Seattle" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["location"], "Seattle");
    assert_eq!(response.body["specialty"], "Cardiology");
}

#[tokio::test]
async fn deleting_own_account_removes_identity_and_records() {
    let app = TestApp::new();
    let (uid, token) = app.sign_up_doctor("grey@example.com").await;
    app.monday_slot(&token).await;

    let response = app
        .call(Method::DELETE, &format!("/api/v1/users/{}", uid), Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert!(response.headers.get(header::SET_COOKIE).is_some());
    assert_eq!(
        app.identity.deleted_accounts(),
        vec![UserId::new(uid.clone()).unwrap()]
    );

    let directory = app.call(Method::GET, "/api/v1/doctors", None, None).await;
    assert!(directory.body["doctors"].as_array().unwrap().is_empty());
    let slots = app
        .call(Method::GET, &format!("/api/v1/schedules/{}", uid), None, None)
        .await;
    assert!(slots.body.as_array().unwrap().is_empty());
}

// =============================================================================
// Identity provider failures
// =============================================================================

#[tokio::test]
async fn identity_outage_is_bad_gateway() {
    let app = TestApp::new();
    app.identity
        .set_error(IdentityError::Unavailable("connection refused".to_string()));

    let response = app
        .call(
            Method::POST,
            "/api/v1/users/login",
            None,
            Some(json!({ "email": "karev@example.com", "password": "secret-pw" })),
        )
        .await;

    assert_error(&response, StatusCode::BAD_GATEWAY, "IDENTITY_PROVIDER_ERROR");
}
