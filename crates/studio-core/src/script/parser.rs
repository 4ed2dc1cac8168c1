//! Parser for markdown script blueprints.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ViralScript;

/// `## 1. Title Options` or `## Title Options`
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^##\s+(?:\d+\.\s*)?(.+?)\s*$").expect("heading pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    Titles,
    Description,
    Tags,
    ThumbnailConcepts,
    Storyboard,
    Script,
    Monetization,
}

/// Checked in order; the first key contained in the heading wins.
/// `description` must precede `script` since it contains it.
const SECTION_KEYS: &[(&str, Section)] = &[
    ("title", Section::Titles),
    ("description", Section::Description),
    ("tags", Section::Tags),
    ("thumbnail", Section::ThumbnailConcepts),
    ("storyboard", Section::Storyboard),
    ("script", Section::Script),
    ("monetization", Section::Monetization),
];

const CANONICAL_HEADINGS: [&str; 7] = [
    "Title Options",
    "Description",
    "Tags",
    "Thumbnail Concepts",
    "Script",
    "Storyboard",
    "Monetization",
];

fn match_section(heading: &str) -> Option<Section> {
    let heading = heading.to_lowercase();
    SECTION_KEYS
        .iter()
        .find(|(key, _)| heading.contains(key))
        .map(|(_, section)| *section)
}

/// Parse a markdown script blueprint into its named sections.
///
/// Never fails: sections that are missing come back as empty values,
/// lines under unknown headings are dropped and a repeated heading
/// replaces whatever the earlier occurrence collected.
pub fn parse_script(markdown: &str) -> ViralScript {
    let mut sections: HashMap<Section, Vec<&str>> = HashMap::new();
    let mut current: Option<Section> = None;

    for line in markdown.lines() {
        if let Some(heading) = HEADING_RE.captures(line).and_then(|caps| caps.get(1)) {
            current = match_section(heading.as_str());
            if let Some(section) = current {
                sections.insert(section, Vec::new());
            }
            continue;
        }

        if let Some(section) = current {
            sections.entry(section).or_default().push(line);
        }
    }

    let body = |section: Section| sections.get(&section).map(Vec::as_slice).unwrap_or(&[]);

    ViralScript {
        titles: list_field(body(Section::Titles)),
        description: text_field(body(Section::Description)),
        tags: tags_field(body(Section::Tags)),
        thumbnail_concepts: list_field(body(Section::ThumbnailConcepts)),
        script: text_field(body(Section::Script)),
        storyboard: text_field(body(Section::Storyboard)),
        monetization: text_field(body(Section::Monetization)),
    }
}

/// Render a script back into markdown using the canonical numbered headings.
pub fn render_script(script: &ViralScript) -> String {
    let bodies = [
        script.titles.join("\n"),
        script.description.clone(),
        script.tags.join(", "),
        script.thumbnail_concepts.join("\n"),
        script.script.clone(),
        script.storyboard.clone(),
        script.monetization.clone(),
    ];

    let mut out = String::new();
    for (index, (heading, body)) in CANONICAL_HEADINGS.iter().zip(bodies.iter()).enumerate() {
        out.push_str(&format!("## {}. {}\n", index + 1, heading));
        if !body.is_empty() {
            out.push_str(body);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// One entry per line; lines of two characters or fewer are stray bullet markers.
fn list_field(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

fn tags_field(lines: &[&str]) -> Vec<String> {
    lines
        .join(",")
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body lines rejoined, without the blank lines that surround them.
fn text_field(lines: &[&str]) -> String {
    let start = lines.iter().position(|line| !line.trim().is_empty());
    let end = lines.iter().rposition(|line| !line.trim().is_empty());

    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_titles_and_description() {
        let input = "## 1. Title Options\nCat Video\nDog Video\n\n## 2. Description\nA fun video.\n";
        let script = parse_script(input);

        assert_eq!(script.titles, vec!["Cat Video", "Dog Video"]);
        assert_eq!(script.description, "A fun video.");
        assert!(script.tags.is_empty());
        assert!(script.thumbnail_concepts.is_empty());
        assert_eq!(script.script, "");
        assert_eq!(script.storyboard, "");
        assert_eq!(script.monetization, "");
    }

    #[test]
    fn missing_sections_are_empty() {
        let script = parse_script("just some prose without any headings");
        assert!(script.is_empty());

        let script = parse_script("");
        assert!(script.is_empty());
    }

    #[test]
    fn headings_match_case_insensitively_without_numbers() {
        let input = "## TAGS\ncats, dogs\n## full script\nHello there\n";
        let script = parse_script(input);

        assert_eq!(script.tags, vec!["cats", "dogs"]);
        assert_eq!(script.script, "Hello there");
    }

    #[test]
    fn description_heading_is_not_taken_for_script() {
        let script = parse_script("## Video Description\nAbout cats\n");
        assert_eq!(script.description, "About cats");
        assert_eq!(script.script, "");
    }

    #[test]
    fn unmatched_heading_content_is_dropped() {
        let input = "## 1. Title Options\nCat Video\n## Bonus Notes\nignore me\n## 2. Description\nKept\n";
        let script = parse_script(input);

        assert_eq!(script.titles, vec!["Cat Video"]);
        assert_eq!(script.description, "Kept");
        assert!(!render_script(&script).contains("ignore me"));
    }

    #[test]
    fn repeated_heading_overwrites_earlier_section() {
        let input = "## Description\nfirst\n## Tags\na\n## Description\nsecond\n";
        let script = parse_script(input);

        assert_eq!(script.description, "second");
        assert_eq!(script.tags, vec!["a"]);
    }

    #[test]
    fn short_lines_are_filtered_from_lists() {
        let input = "## Thumbnail Concepts\n-\n*\nBig red arrow\n  \nShocked face\n";
        let script = parse_script(input);

        assert_eq!(script.thumbnail_concepts, vec!["Big red arrow", "Shocked face"]);
    }

    #[test]
    fn tags_are_split_across_lines_and_commas() {
        let input = "## Tags\ncats, kittens,\n , pets\nfunny\n";
        let script = parse_script(input);

        assert_eq!(script.tags, vec!["cats", "kittens", "pets", "funny"]);
    }

    #[test]
    fn text_before_first_heading_is_ignored() {
        let input = "Here is your blueprint!\n\n## Script\n[HOOK] Wait for it\n\n[BODY] More\n";
        let script = parse_script(input);

        assert_eq!(script.script, "[HOOK] Wait for it\n\n[BODY] More");
    }

    #[test]
    fn deeper_headings_stay_in_body() {
        let input = "## Storyboard\n### Scene 1\nWide shot\n";
        let script = parse_script(input);

        assert_eq!(script.storyboard, "### Scene 1\nWide shot");
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let input = "## 1. Title Options\r\nCat Video\r\n## 2. Description\r\nA fun video.\r\n";
        let script = parse_script(input);

        assert_eq!(script.titles, vec!["Cat Video"]);
        assert_eq!(script.description, "A fun video.");
    }

    #[test]
    fn render_then_parse_round_trips() {
        let script = ViralScript {
            titles: vec!["Cat Video".into(), "Dog Video".into()],
            description: "A fun video.\nSecond line.".into(),
            tags: vec!["cats".into(), "dogs".into()],
            thumbnail_concepts: vec!["Cat mid-jump".into()],
            script: "[HOOK] Look!\n\n[OUTRO] Subscribe".into(),
            storyboard: "Shot 1: cat\nShot 2: dog".into(),
            monetization: "Affiliate links for cat toys".into(),
        };

        assert_eq!(parse_script(&render_script(&script)), script);
    }

    #[test]
    fn rendering_an_empty_script_round_trips() {
        let script = ViralScript::default();
        assert_eq!(parse_script(&render_script(&script)), script);
    }
}
