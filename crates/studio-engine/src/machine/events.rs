//! Events that move an action through its lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionEvent {
    // ========== Guards ==========
    /// Required input was missing or rejected; nothing was sent.
    ValidationFailed { message: String },

    /// The plan's monthly ceiling was reached; nothing was sent.
    QuotaExceeded { limit: u32 },

    // ========== Request ==========
    /// A request was issued. Replaces any earlier request of the same action.
    Submitted { request_id: Uuid },

    Succeeded { request_id: Uuid },

    Failed { request_id: Uuid, message: String },

    Cancelled { request_id: Uuid },
}

impl ActionEvent {
    /// Request the event refers to, if any.
    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            Self::Submitted { request_id }
            | Self::Succeeded { request_id }
            | Self::Failed { request_id, .. }
            | Self::Cancelled { request_id } => Some(*request_id),
            Self::ValidationFailed { .. } | Self::QuotaExceeded { .. } => None,
        }
    }
}
