use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label used for a module or epic that was never declared.
pub const UNKNOWN: &str = "Unknown";

static STORY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*$").expect("story id pattern is valid"));

/// A story identifier made of one or more dot-separated numeric segments.
///
/// Examples: `1`, `2.3`, `4.1.7`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoryId(String);

impl StoryId {
    /// Creates a new `StoryId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStoryId` if the string is not a dotted numeric id.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidStoryId> {
        let s = s.into();
        let trimmed = s.trim();
        if STORY_ID.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidStoryId(s))
        }
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the numeric segments of the id.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl Deref for StoryId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StoryId {
    type Err = InvalidStoryId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StoryId {
    type Error = InvalidStoryId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StoryId> for String {
    fn from(id: StoryId) -> Self {
        id.0
    }
}

/// Error returned when a string is not a dotted numeric story id.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid story id '{0}': expected digits separated by dots (e.g. '1' or '2.3')")]
pub struct InvalidStoryId(String);

/// An epic declaration, e.g. `Epic 3: Checkout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epic {
    /// The digits following `Epic`, verbatim.
    pub number: String,
    /// The free-text title, trimmed.
    pub title: String,
}

impl fmt::Display for Epic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.number, self.title)
    }
}

/// A user story declared in a document.
///
/// Module and epic are copied from the walk state at the moment the story is
/// declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    /// The document module label.
    pub module: String,
    /// The combined epic label (`"<number>: <title>"`) or `Unknown`.
    pub epic: String,
    /// The story id.
    pub id: StoryId,
    /// The story title.
    pub title: String,
    /// Number of non-blank data rows in the acceptance criteria tables
    /// attributed to this story.
    pub criteria_count: usize,
}

impl Story {
    /// Creates a story with no acceptance criteria counted yet.
    #[must_use]
    pub const fn new(module: String, epic: String, id: StoryId, title: String) -> Self {
        Self {
            module,
            epic,
            id,
            title,
            criteria_count: 0,
        }
    }
}

/// A single acceptance criterion row.
///
/// The owning story's identity is copied, not linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceCriterion {
    /// The owning story's module.
    pub module: String,
    /// The owning story's epic label.
    pub epic: String,
    /// The owning story's id.
    pub story_id: StoryId,
    /// The owning story's title.
    pub story_title: String,
    /// The criterion number, possibly empty.
    pub number: String,
    /// The scenario text, falling back to the free-text criteria column.
    pub scenario: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_id_accepts_dotted_numbers() {
        assert_eq!(StoryId::new("1").unwrap().as_str(), "1");
        assert_eq!(StoryId::new(" 2.3 ").unwrap().as_str(), "2.3");

        let id = StoryId::new("4.1.7").unwrap();
        assert_eq!(id.segments().collect::<Vec<_>>(), ["4", "1", "7"]);
    }

    #[test]
    fn story_id_rejects_malformed_input() {
        for bad in ["", "a", "1.", ".1", "1..2", "1.a", "1 2"] {
            assert!(StoryId::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn story_id_error_display() {
        let error = StoryId::new("x").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid story id 'x': expected digits separated by dots (e.g. '1' or '2.3')"
        );
    }

    #[test]
    fn epic_display_combines_number_and_title() {
        let epic = Epic {
            number: "1".to_string(),
            title: "Payments".to_string(),
        };
        assert_eq!(epic.to_string(), "1: Payments");
    }

    #[test]
    fn new_story_has_no_criteria() {
        let story = Story::new(
            UNKNOWN.to_string(),
            UNKNOWN.to_string(),
            StoryId::new("1").unwrap(),
            "Login".to_string(),
        );
        assert_eq!(story.criteria_count, 0);
    }
}
