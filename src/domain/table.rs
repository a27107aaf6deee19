use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::{AcceptanceCriterion, Story, StoryId};

/// A typed cell value, used where the output format distinguishes numbers
/// from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue<'a> {
    /// Free text.
    Text(&'a str),
    /// A non-negative count.
    Number(usize),
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A row type of one of the output tables.
///
/// `COLUMNS` is the ordered column set; the serde representation of the row
/// uses exactly these names.
pub trait Record: Serialize + DeserializeOwned {
    /// Ordered column names.
    const COLUMNS: &'static [&'static str];

    /// Sheet (or stream) name used when exporting.
    const SHEET: &'static str;

    /// Cell values in column order.
    fn cells(&self) -> Vec<CellValue<'_>>;
}

/// One row of the stories table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRow {
    /// Document module label.
    #[serde(rename = "Module")]
    pub module: String,
    /// Combined epic label.
    #[serde(rename = "Epic")]
    pub epic: String,
    /// Story id.
    #[serde(rename = "Story ID")]
    pub story_id: StoryId,
    /// Story title.
    #[serde(rename = "Story Title")]
    pub story_title: String,
    /// Number of acceptance criteria rows attributed to the story.
    #[serde(rename = "Acceptance Criteria Count")]
    pub criteria_count: usize,
    /// Display name of the originating document.
    #[serde(rename = "Source File")]
    pub source_file: String,
}

impl StoryRow {
    /// Stamps a story with the name of the document it came from.
    #[must_use]
    pub fn new(story: Story, source_file: &str) -> Self {
        Self {
            module: story.module,
            epic: story.epic,
            story_id: story.id,
            story_title: story.title,
            criteria_count: story.criteria_count,
            source_file: source_file.to_string(),
        }
    }
}

impl Record for StoryRow {
    const COLUMNS: &'static [&'static str] = &[
        "Module",
        "Epic",
        "Story ID",
        "Story Title",
        "Acceptance Criteria Count",
        "Source File",
    ];

    const SHEET: &'static str = "Stories";

    fn cells(&self) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Text(&self.module),
            CellValue::Text(&self.epic),
            CellValue::Text(self.story_id.as_str()),
            CellValue::Text(&self.story_title),
            CellValue::Number(self.criteria_count),
            CellValue::Text(&self.source_file),
        ]
    }
}

/// One row of the acceptance criteria table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionRow {
    /// Owning story's module.
    #[serde(rename = "Module")]
    pub module: String,
    /// Owning story's epic label.
    #[serde(rename = "Epic")]
    pub epic: String,
    /// Owning story's id.
    #[serde(rename = "Story ID")]
    pub story_id: StoryId,
    /// Owning story's title.
    #[serde(rename = "Story Title")]
    pub story_title: String,
    /// Criterion number, possibly empty.
    #[serde(rename = "AC #")]
    pub number: String,
    /// Scenario text.
    #[serde(rename = "Scenario")]
    pub scenario: String,
    /// Display name of the originating document.
    #[serde(rename = "Source File")]
    pub source_file: String,
}

impl CriterionRow {
    /// Stamps a criterion with the name of the document it came from.
    #[must_use]
    pub fn new(criterion: AcceptanceCriterion, source_file: &str) -> Self {
        Self {
            module: criterion.module,
            epic: criterion.epic,
            story_id: criterion.story_id,
            story_title: criterion.story_title,
            number: criterion.number,
            scenario: criterion.scenario,
            source_file: source_file.to_string(),
        }
    }
}

impl Record for CriterionRow {
    const COLUMNS: &'static [&'static str] = &[
        "Module",
        "Epic",
        "Story ID",
        "Story Title",
        "AC #",
        "Scenario",
        "Source File",
    ];

    const SHEET: &'static str = "Acceptance Criteria";

    fn cells(&self) -> Vec<CellValue<'_>> {
        vec![
            CellValue::Text(&self.module),
            CellValue::Text(&self.epic),
            CellValue::Text(self.story_id.as_str()),
            CellValue::Text(&self.story_title),
            CellValue::Text(&self.number),
            CellValue::Text(&self.scenario),
            CellValue::Text(&self.source_file),
        ]
    }
}

/// An ordered table of records.
///
/// The column set comes from the record type, so an empty table still has a
/// complete schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<R> {
    rows: Vec<R>,
}

/// The stories output table.
pub type StoriesTable = Table<StoryRow>;

/// The acceptance criteria output table.
pub type CriteriaTable = Table<CriterionRow>;

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Record> Table<R> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered column names.
    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    /// Sheet name used when exporting.
    #[must_use]
    pub fn sheet_name(&self) -> &'static str {
        R::SHEET
    }
}

impl<R> Table<R> {
    /// The rows, in order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    /// Appends all rows of another table, preserving order.
    pub fn append(&mut self, other: &mut Self) {
        self.rows.append(&mut other.rows);
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    /// Keeps only the rows matching the predicate.
    #[must_use]
    pub fn filtered(&self, mut predicate: impl FnMut(&R) -> bool) -> Self
    where
        R: Clone,
    {
        Self {
            rows: self.rows.iter().filter(|row| predicate(row)).cloned().collect(),
        }
    }
}

impl<R> From<Vec<R>> for Table<R> {
    fn from(rows: Vec<R>) -> Self {
        Self { rows }
    }
}

impl<R> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<R> Extend<R> for Table<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

impl<R> IntoIterator for Table<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
