use std::fmt;

use serde::{Deserialize, Serialize};
use studio_core::{classify_error, user_message, ErrorCategory, StudioError};
use studio_llm::LLMError;
use thiserror::Error;
use uuid::Uuid;

use crate::machine::{ActionMachine, ActionPhase};
use crate::media::MediaSlot;

/// Every generation action the studio offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Analyze,
    Script,
    Improve,
    Image,
    Video,
    Speech,
    Retirement,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Analyze,
        ActionKind::Script,
        ActionKind::Improve,
        ActionKind::Image,
        ActionKind::Video,
        ActionKind::Speech,
        ActionKind::Retirement,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Script => "script",
            Self::Improve => "improve",
            Self::Image => "image",
            Self::Video => "video",
            Self::Speech => "speech",
            Self::Retirement => "retirement",
        }
    }

    /// Slot whose media handle a successful result replaces.
    pub fn media_slot(self) -> Option<MediaSlot> {
        match self {
            Self::Image => Some(MediaSlot::Image),
            Self::Video => Some(MediaSlot::Video),
            Self::Speech => Some(MediaSlot::Speech),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one action as a front end would render it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ActionState {
    pub phase: ActionPhase,
    pub loading: bool,
    pub error: Option<String>,
    pub request_id: Option<Uuid>,
}

impl From<&ActionMachine> for ActionState {
    fn from(machine: &ActionMachine) -> Self {
        Self {
            phase: machine.phase(),
            loading: machine.phase().is_pending(),
            error: machine.error().map(str::to_string),
            request_id: machine.request_id(),
        }
    }
}

/// Why an action produced no result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Input rejected before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The plan's monthly ceiling blocked the request.
    #[error("Monthly limit of {limit} generations reached; upgrade to continue")]
    UpgradeRequired { limit: u32 },

    /// The provider call failed or returned something unusable.
    #[error("{message}")]
    Provider {
        category: ErrorCategory,
        message: String,
    },

    /// Cancelled or superseded. Not an error for the user.
    #[error("Request cancelled")]
    Cancelled,
}

pub type ActionResult<T> = std::result::Result<T, ActionError>;

impl ActionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub(crate) fn from_llm(error: &LLMError) -> Self {
        let raw = error.to_string();
        let category = match error {
            LLMError::Blocked(_) => ErrorCategory::SafetyBlocked,
            LLMError::Auth(_) => ErrorCategory::InvalidApiKey,
            _ => classify_error(&raw),
        };
        Self::Provider {
            category,
            message: user_message(category, &raw),
        }
    }
}

impl From<StudioError> for ActionError {
    fn from(error: StudioError) -> Self {
        match error {
            StudioError::UpgradeRequired { limit } => Self::UpgradeRequired { limit },
            StudioError::Validation(message) => Self::Validation(message),
            e @ (StudioError::UnsupportedFileType { .. } | StudioError::FileTooLarge { .. }) => {
                Self::Validation(e.to_string())
            }
            other => {
                let raw = other.to_string();
                let category = classify_error(&raw);
                Self::Provider {
                    category,
                    message: user_message(category, &raw),
                }
            }
        }
    }
}
