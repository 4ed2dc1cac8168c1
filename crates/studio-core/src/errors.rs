//! Classification of provider failures into user-facing messages.

use serde::{Deserialize, Serialize};

pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    SafetyBlocked,
    QuotaExhausted,
    InvalidApiKey,
    BillingNotEnabled,
    ServerError,
    Unknown,
}

/// Substrings checked in order; the first hit decides the category.
const PATTERNS: &[(&str, ErrorCategory)] = &[
    ("safety", ErrorCategory::SafetyBlocked),
    ("blocked", ErrorCategory::SafetyBlocked),
    ("resource_exhausted", ErrorCategory::QuotaExhausted),
    ("quota", ErrorCategory::QuotaExhausted),
    ("rate limit", ErrorCategory::QuotaExhausted),
    ("api key not valid", ErrorCategory::InvalidApiKey),
    ("api_key_invalid", ErrorCategory::InvalidApiKey),
    ("invalid api key", ErrorCategory::InvalidApiKey),
    ("billing", ErrorCategory::BillingNotEnabled),
    ("internal", ErrorCategory::ServerError),
    ("http 500", ErrorCategory::ServerError),
    ("http 502", ErrorCategory::ServerError),
    ("http 503", ErrorCategory::ServerError),
    ("unavailable", ErrorCategory::ServerError),
];

pub fn classify_error(raw: &str) -> ErrorCategory {
    let lowered = raw.to_lowercase();
    PATTERNS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or(ErrorCategory::Unknown)
}

/// Message shown to the user for a failure of `category`.
pub fn user_message(category: ErrorCategory, raw: &str) -> String {
    let fixed = match category {
        ErrorCategory::SafetyBlocked => {
            "The request was blocked by the content safety filters. Please adjust your input and try again."
        }
        ErrorCategory::QuotaExhausted => {
            "The AI service quota has been exhausted. Please wait a moment and try again."
        }
        ErrorCategory::InvalidApiKey => {
            "The API key is invalid. Please check your key and try again."
        }
        ErrorCategory::BillingNotEnabled => {
            "Billing is not enabled for this API key. Enable billing on your account to use this feature."
        }
        ErrorCategory::ServerError => {
            "The AI service is temporarily unavailable. Please try again later."
        }
        ErrorCategory::Unknown => {
            let raw = raw.trim();
            return if raw.is_empty() {
                GENERIC_ERROR_MESSAGE.to_string()
            } else {
                raw.to_string()
            };
        }
    };
    fixed.to_string()
}
