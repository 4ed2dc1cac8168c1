use serde::{Deserialize, Serialize};

pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
pub const DEFAULT_VOICE: &str = "Kore";

/// Option defaults remembered between generation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Model override for text and JSON actions; `None` uses the provider default.
    pub selected_model: Option<String>,
    pub aspect_ratio: String,
    pub voice: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_model: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"voice": "Puck"}"#).unwrap();
        assert_eq!(prefs.voice, "Puck");
        assert_eq!(prefs.aspect_ratio, DEFAULT_ASPECT_RATIO);
        assert_eq!(prefs.selected_model, None);
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(Preferences::default()).unwrap();
        assert_eq!(value["aspectRatio"], "16:9");
        assert!(value.get("selectedModel").is_some());
    }
}
