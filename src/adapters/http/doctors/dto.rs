//! HTTP DTOs for doctor endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::scheduling::{DoctorPatch, DoctorProfile};

/// Partial doctor update; an empty body only refreshes `updated_at`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDoctorRequest {
    pub specialty: Option<String>,
    pub location: Option<String>,
}

impl From<UpdateDoctorRequest> for DoctorPatch {
    fn from(req: UpdateDoctorRequest) -> Self {
        DoctorPatch {
            specialty: req.specialty,
            location: req.location,
        }
    }
}

/// Body of `GET /doctors`.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorListResponse {
    pub doctors: Vec<DoctorProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_an_empty_patch() {
        let req: UpdateDoctorRequest = serde_json::from_str("{}").unwrap();
        assert!(DoctorPatch::from(req).is_empty());
    }

    #[test]
    fn list_is_wrapped_in_doctors_key() {
        let json = serde_json::to_value(DoctorListResponse { doctors: vec![] }).unwrap();
        assert_eq!(json, serde_json::json!({ "doctors": [] }));
    }
}
