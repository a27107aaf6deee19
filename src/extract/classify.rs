use super::TableBlock;

/// Keywords that mark a row as an acceptance criteria header.
pub const KEYWORDS: &[&str] = &[
    "acceptance",
    "criteria",
    "scenario",
    "given",
    "when",
    "then",
    "expected",
    "result",
];

/// Rows inspected for a header; some documents put a title row above it.
const HEADER_CANDIDATES: usize = 2;

/// Decides which tables hold acceptance criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    keywords: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            keywords: KEYWORDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Classifier {
    /// The built-in keywords plus the given extra keywords.
    #[must_use]
    pub fn with_keywords(extra: &[String]) -> Self {
        let mut classifier = Self::default();
        for keyword in extra {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !classifier.keywords.contains(&keyword) {
                classifier.keywords.push(keyword);
            }
        }
        classifier
    }

    /// The keywords in use, lowercase.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns the header row index if the table is an acceptance criteria
    /// table.
    ///
    /// Only the first two rows are inspected; the first one containing any
    /// keyword (as a case-insensitive substring of its cells) is the header.
    #[must_use]
    pub fn header_row(&self, table: &TableBlock) -> Option<usize> {
        table
            .rows()
            .iter()
            .take(HEADER_CANDIDATES)
            .position(|cells| self.is_header(cells))
    }

    /// Whether the table is an acceptance criteria table.
    #[must_use]
    pub fn is_relevant(&self, table: &TableBlock) -> bool {
        self.header_row(table).is_some()
    }

    fn is_header(&self, cells: &[String]) -> bool {
        let text = cells
            .iter()
            .map(|cell| cell.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(" | ");
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }
}
