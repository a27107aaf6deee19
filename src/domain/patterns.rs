use std::sync::LazyLock;

use regex::Regex;

use super::{Epic, StoryId};

static EPIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*Epic\s+(\d+)\s*[:\-\x{2013}\x{2014}]\s*(.+)$")
        .expect("epic pattern is valid")
});

static STORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:User\s+)?Story\s+(\d+(?:\.\d+)*)\s*[:\-\x{2013}\x{2014}]\s*(.+)$")
        .expect("story pattern is valid")
});

static MODULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Module\s*[:\-\x{2013}\x{2014}]\s*(.+)").expect("module pattern is valid")
});

/// A recognised story declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDeclaration {
    /// The declared id.
    pub id: StoryId,
    /// The declared title, trimmed.
    pub title: String,
}

/// Matches a whole line against the epic declaration pattern.
///
/// `Epic 3: Checkout`, `epic 3 - Checkout` and `Epic 3 – Checkout` all match.
#[must_use]
pub fn match_epic(line: &str) -> Option<Epic> {
    let captures = EPIC.captures(line)?;
    Some(Epic {
        number: captures[1].to_string(),
        title: captures[2].trim().to_string(),
    })
}

/// Matches a whole line against the story declaration pattern.
///
/// The `User` prefix is optional and ids may be dotted (`Story 2.3: ...`).
#[must_use]
pub fn match_story(line: &str) -> Option<StoryDeclaration> {
    let captures = STORY.captures(line)?;
    Some(StoryDeclaration {
        id: StoryId::new(&captures[1]).ok()?,
        title: captures[2].trim().to_string(),
    })
}

/// Finds the first `Module: <name>` declaration anywhere in the text.
#[must_use]
pub fn find_module(text: &str) -> Option<String> {
    MODULE
        .captures(text)
        .map(|captures| captures[1].trim().to_string())
}
