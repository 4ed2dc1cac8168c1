use serde::{Deserialize, Serialize};

/// User-authored style descriptor injected into text-generation prompts.
///
/// Persisted as-is; the prompt fragment is derived from it and never parsed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandVoice {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub example: String,
}

impl BrandVoice {
    pub fn new(
        tone: impl Into<String>,
        audience: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            tone: tone.into(),
            audience: audience.into(),
            example: example.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tone.trim().is_empty()
            && self.audience.trim().is_empty()
            && self.example.trim().is_empty()
    }

    /// The text appended to prompts, or `None` when nothing was filled in.
    pub fn to_prompt_fragment(&self) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(tone) = non_empty(&self.tone) {
            parts.push(format!("Tone and Style: {tone}."));
        }
        if let Some(audience) = non_empty(&self.audience) {
            parts.push(format!("Target Audience: {audience}."));
        }
        if let Some(example) = non_empty(&self.example) {
            parts.push(format!("Example: \"{example}\""));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_contains_all_fields() {
        let voice = BrandVoice::new("Playful", "Gen Z gamers", "No cap, this slaps");
        assert_eq!(
            voice.to_prompt_fragment().as_deref(),
            Some(
                "Tone and Style: Playful. Target Audience: Gen Z gamers. Example: \"No cap, this slaps\""
            )
        );
    }

    #[test]
    fn empty_fields_are_omitted() {
        let voice = BrandVoice::new("  ", "Founders", "");
        assert_eq!(
            voice.to_prompt_fragment().as_deref(),
            Some("Target Audience: Founders.")
        );
    }

    #[test]
    fn empty_voice_has_no_fragment() {
        assert!(BrandVoice::default().is_empty());
        assert_eq!(BrandVoice::default().to_prompt_fragment(), None);
    }

    #[test]
    fn delimiter_phrases_survive_persistence() {
        let voice = BrandVoice::new(
            "Calm. Target Audience: nobody",
            "Engineers",
            "Example: \"quoted\"",
        );
        let json = serde_json::to_string(&voice).unwrap();
        let restored: BrandVoice = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, voice);
    }
}
