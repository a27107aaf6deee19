//! The document walk.
//!
//! A document body is read into an ordered sequence of [`Block`]s. The
//! [`Extractor`] walks them once, tracking module, epic and story context, and
//! attributes every acceptance criteria table to the story declared before it.

mod block;
pub use block::{Block, TableBlock};

/// Acceptance criteria table detection.
pub mod classify;
pub use classify::Classifier;

/// Acceptance criteria row extraction and counting.
pub mod rows;

mod walker;
pub use walker::{ParsedDocument, WalkState};

use tracing::instrument;

use crate::{Config, domain::HeaderAliases, storage::ReadError};

/// Extracts stories and acceptance criteria from documents.
///
/// An extractor holds the header alias table and the table keyword set; it
/// carries no state between documents.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    aliases: HeaderAliases,
    classifier: Classifier,
}

impl Extractor {
    /// Creates an extractor from the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            aliases: HeaderAliases::with_overrides(config.header_aliases()),
            classifier: Classifier::with_keywords(config.table_keywords()),
        }
    }

    /// Parses a `.docx` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be opened as a Word document.
    #[instrument(level = "debug", skip_all, fields(bytes = bytes.len()))]
    pub fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument, ReadError> {
        let blocks = crate::storage::docx::read_blocks(bytes)?;
        Ok(self.extract_blocks(&blocks))
    }

    /// Walks an already-read block sequence.
    #[must_use]
    pub fn extract_blocks(&self, blocks: &[Block]) -> ParsedDocument {
        walker::walk(blocks, self)
    }

    /// The header alias table in use.
    #[must_use]
    pub const fn aliases(&self) -> &HeaderAliases {
        &self.aliases
    }

    /// The table classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DocxBuilder;

    #[test]
    fn parse_reads_and_walks_a_document() {
        let bytes = DocxBuilder::new()
            .paragraph("Module: Payments")
            .paragraph("Epic 1: Payments")
            .paragraph("User Story 1: Add UPI option")
            .table(&[
                &["Sr. No", "Scenario", "Acceptance Criteria"],
                &["1.1", "Navigate to Payments", "Given... When... Then..."],
            ])
            .build();

        let document = Extractor::default().parse(&bytes).unwrap();

        assert_eq!(document.stories.len(), 1);
        assert_eq!(document.criteria.len(), 1);
        assert_eq!(document.stories[0].module, "Payments");
    }

    #[test]
    fn configured_aliases_and_keywords_apply() {
        let mut config = Config::default();
        config.add_header_alias("Step", "Scenario");
        config.add_table_keyword("step");
        let extractor = Extractor::new(&config);

        let blocks = vec![
            Block::paragraph("Story 4: Export"),
            Block::table(vec![
                vec!["Ref".into(), "Step".into()],
                vec!["A".into(), "Click export".into()],
            ]),
        ];

        let document = extractor.extract_blocks(&blocks);
        assert_eq!(document.criteria.len(), 1);
        assert_eq!(document.criteria[0].scenario, "Click export");
        assert_eq!(document.criteria[0].number, "");

        // Without the configuration the table is not recognised.
        let document = Extractor::default().extract_blocks(&blocks);
        assert!(document.criteria.is_empty());
    }

    #[test]
    fn corrupt_bytes_are_unreadable() {
        let error = crate::parse(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(error, ReadError::Archive(_)));
    }
}
