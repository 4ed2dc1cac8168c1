use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::{AnalysisResult, MediaKind, RetirementPlan};
use crate::script::ViralScript;

pub const ANALYSIS_HISTORY_CAP: usize = 50;
pub const GENERATION_HISTORY_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Analysis,
    Script,
    Improvement,
    Retirement,
    Media,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryPayload {
    Analysis(AnalysisResult),
    Script { topic: String, script: ViralScript },
    Improvement { original: String, improved: String },
    Retirement(RetirementPlan),
    /// Binary outputs are not persisted, only what produced them.
    Media {
        kind: MediaKind,
        prompt: String,
        mime_type: String,
    },
}

impl HistoryPayload {
    pub fn kind(&self) -> HistoryKind {
        match self {
            Self::Analysis(_) => HistoryKind::Analysis,
            Self::Script { .. } => HistoryKind::Script,
            Self::Improvement { .. } => HistoryKind::Improvement,
            Self::Retirement(_) => HistoryKind::Retirement,
            Self::Media { .. } => HistoryKind::Media,
        }
    }
}

/// A persisted record of a past result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub result: HistoryPayload,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl HistoryItem {
    pub fn new(result: HistoryPayload, file_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: result.kind(),
            result,
            timestamp: Utc::now(),
            file_name,
        }
    }

    /// One-line description for listings.
    pub fn headline(&self) -> String {
        match &self.result {
            HistoryPayload::Analysis(result) => {
                let subject = self.file_name.as_deref().unwrap_or("pasted text");
                format!("{} analysis of {}", result.mode(), subject)
            }
            HistoryPayload::Script { topic, .. } => format!("Script: {topic}"),
            HistoryPayload::Improvement { original, .. } => {
                format!("Improved: {}", truncate(original, 48))
            }
            HistoryPayload::Retirement(plan) => format!(
                "Retirement plan ({})",
                if plan.on_track { "on track" } else { "needs attention" }
            ),
            HistoryPayload::Media { kind, prompt, .. } => {
                format!("{kind:?}: {}", truncate(prompt, 48))
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}
