//! Mapping from domain errors to HTTP responses.
//!
//! Every endpoint returns `Result<_, ApiError>`, so all failures leave the
//! service with the same JSON body:
//!
//! ```text
//! { "code": "SLOT_UNAVAILABLE", "message": "...", "details": { ... } }
//! ```

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::foundation::{
    AppointmentId, AuthError, DomainError, ErrorCode, SlotId, UserId, ValidationError,
};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        let details = if err.details.is_empty() {
            None
        } else {
            serde_json::to_value(&err.details).ok()
        };
        Self {
            code: err.code.to_string(),
            message: err.message.clone(),
            details,
        }
    }
}

/// A domain error on its way out of an HTTP handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }
}

/// HTTP status for each error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorCode::UserNotFound
        | ErrorCode::DoctorNotFound
        | ErrorCode::SlotNotFound
        | ErrorCode::AppointmentNotFound => StatusCode::NOT_FOUND,
        ErrorCode::EmailAlreadyRegistered
        | ErrorCode::DoctorProfileExists
        | ErrorCode::SlotUnavailable
        | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::Unauthorized | ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorCode::IdentityProviderError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = %self.0.code, status = status.as_u16(), "{}", self.0.message);
        } else {
            debug!(code = %self.0.code, status = status.as_u16(), "{}", self.0.message);
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Request parsing helpers
// ════════════════════════════════════════════════════════════════════════════

/// JSON body extractor whose rejections use the standard error body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(body_rejected(rejection)),
        }
    }
}

fn body_rejected(rejection: JsonRejection) -> ApiError {
    ApiError(DomainError::new(
        ErrorCode::ValidationFailed,
        format!("Invalid request body: {}", rejection.body_text()),
    ))
}

pub(crate) fn parse_user_id(field: &str, raw: String) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|_| ApiError::from(ValidationError::empty_field(field)))
}

pub(crate) fn parse_slot_id(field: &str, raw: &str) -> Result<SlotId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(ValidationError::invalid_format(field, "expected a UUID")))
}

pub(crate) fn parse_appointment_id(field: &str, raw: &str) -> Result<AppointmentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(ValidationError::invalid_format(field, "expected a UUID")))
}
