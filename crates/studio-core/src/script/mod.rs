//! Viral script blueprints
//!
//! The script generator answers in markdown rather than JSON; this module
//! turns that markdown into a typed record and back.

mod parser;

pub use parser::{parse_script, render_script};

use serde::{Deserialize, Serialize};

/// A video script blueprint split into its named sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralScript {
    pub titles: Vec<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub thumbnail_concepts: Vec<String>,
    pub script: String,
    pub storyboard: String,
    pub monetization: String,
}

impl ViralScript {
    /// True when no section produced any content.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
            && self.description.is_empty()
            && self.tags.is_empty()
            && self.thumbnail_concepts.is_empty()
            && self.script.is_empty()
            && self.storyboard.is_empty()
            && self.monetization.is_empty()
    }
}
