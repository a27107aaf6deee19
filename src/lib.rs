//! Backlog extraction from Word documents
//!
//! Epics, user stories and their acceptance criteria are recovered from
//! semi-structured `.docx` files and flattened into two tables joined by
//! story ID.

pub mod domain;
pub use domain::{
    AcceptanceCriterion, Config, CriteriaTable, CriterionRow, Epic, Record, StoriesTable, Story,
    StoryId, StoryRow, Table,
};

/// Block walking, table classification and row extraction.
pub mod extract;
pub use extract::{Block, Extractor, ParsedDocument, WalkState};

/// Reading `.docx` containers and exporting tables.
pub mod storage;
pub use storage::ReadError;

/// Batch assembly across many documents.
pub mod batch;
pub use batch::{
    BatchResult, DocumentUnreadable, SourceDocument, collect_documents, extract_batch,
    extract_paths,
};

/// Filtering and summary metrics over extracted tables.
pub mod report;

#[cfg(test)]
pub(crate) mod fixtures;

/// Parses a single `.docx` document with the default configuration.
///
/// # Errors
///
/// Returns an error if the bytes are not a readable Word document.
pub fn parse(bytes: &[u8]) -> Result<ParsedDocument, ReadError> {
    Extractor::default().parse(bytes)
}
