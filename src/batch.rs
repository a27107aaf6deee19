//! Batch assembly
//!
//! Documents are parsed independently and in parallel. Their rows are stamped
//! with the document's display name and concatenated in input order; documents
//! that cannot be read are collected as failures without affecting the rest.

use std::{
    collections::HashSet,
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;
use walkdir::WalkDir;

use crate::{
    CriteriaTable, CriterionRow, Extractor, ParsedDocument, ReadError, StoriesTable, StoryRow,
};

/// A document submitted for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Display name, used as the `Source File` of every row.
    pub name: String,
    /// The raw `.docx` bytes.
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    /// Creates a document from its name and contents.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a document from disk, named after its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(display_name(path), bytes))
    }
}

/// A document that could not be opened as a Word document.
#[derive(Debug, thiserror::Error)]
#[error("could not read '{name}': {reason}")]
pub struct DocumentUnreadable {
    /// Display name of the document.
    pub name: String,
    /// The underlying failure.
    #[source]
    pub reason: ReadError,
}

/// The concatenated output of a batch.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Stories from every readable document, in input order.
    pub stories: StoriesTable,
    /// Acceptance criteria from every readable document, in input order.
    pub criteria: CriteriaTable,
    /// Documents that could not be read.
    pub failures: Vec<DocumentUnreadable>,
}

impl BatchResult {
    /// Whether the batch produced no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.criteria.is_empty()
    }

    fn merge(&mut self, name: &str, document: ParsedDocument) {
        self.stories.extend(
            document
                .stories
                .into_iter()
                .map(|story| StoryRow::new(story, name)),
        );
        self.criteria.extend(
            document
                .criteria
                .into_iter()
                .map(|criterion| CriterionRow::new(criterion, name)),
        );
    }

    fn fail(&mut self, name: String, reason: ReadError) {
        let failure = DocumentUnreadable { name, reason };
        tracing::warn!("{failure}");
        self.failures.push(failure);
    }
}

/// Parses every document and concatenates the results in input order.
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn extract_batch(extractor: &Extractor, documents: &[SourceDocument]) -> BatchResult {
    let parsed: Vec<_> = documents
        .par_iter()
        .map(|document| extractor.parse(&document.bytes))
        .collect();

    let mut batch = BatchResult::default();
    for (document, result) in documents.iter().zip(parsed) {
        match result {
            Ok(parsed) => batch.merge(&document.name, parsed),
            Err(reason) => batch.fail(document.name.clone(), reason),
        }
    }
    batch
}

/// Reads and parses the documents at the given paths.
///
/// Files that cannot be read from disk are reported as failures alongside
/// documents that cannot be parsed.
#[instrument(skip_all, fields(documents = paths.len()))]
pub fn extract_paths(extractor: &Extractor, paths: &[PathBuf]) -> BatchResult {
    let parsed: Vec<_> = paths
        .par_iter()
        .map(|path| {
            std::fs::read(path)
                .map_err(ReadError::from)
                .and_then(|bytes| extractor.parse(&bytes))
        })
        .collect();

    let mut batch = BatchResult::default();
    for (path, result) in paths.iter().zip(parsed) {
        let name = display_name(path);
        match result {
            Ok(parsed) => batch.merge(&name, parsed),
            Err(reason) => batch.fail(name, reason),
        }
    }
    batch
}

/// Expands the given paths into the list of documents to process.
///
/// Directories are searched recursively for `.docx` files (extension matched
/// case-insensitively), skipping Word lock files (`~$...`). Files named
/// explicitly are kept as given. A document whose display name was already
/// seen is dropped.
pub fn collect_documents<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut documents = Vec::new();

    for root in paths {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable path: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.depth() > 0 && !is_docx(entry.path()) {
                continue;
            }

            let name = display_name(entry.path());
            if !seen.insert(name.clone()) {
                tracing::warn!(
                    "Skipping {}: a document named '{name}' was already collected",
                    entry.path().display()
                );
                continue;
            }
            documents.push(entry.into_path());
        }
    }

    documents
}

fn is_docx(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.starts_with("~$"));
    let has_extension = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));
    has_extension && !is_lock_file
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
