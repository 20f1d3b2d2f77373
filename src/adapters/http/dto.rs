//! Response bodies shared by several endpoint groups.

use serde::{Deserialize, Serialize};

/// Plain confirmation body, e.g. `{"message": "User logged out successfully!"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
