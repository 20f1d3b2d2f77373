//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Cancelling or deleting an appointment makes its slot available again
    #[serde(default = "default_release_slot_on_cancel")]
    pub release_slot_on_cancel: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            release_slot_on_cancel: default_release_slot_on_cancel(),
        }
    }
}

fn default_release_slot_on_cancel() -> bool {
    true
}
