use tracing::{debug, trace};

use super::{Block, Extractor, TableBlock, rows};
use crate::domain::{
    AcceptanceCriterion, Epic, Story,
    patterns::{self, StoryDeclaration},
    story::UNKNOWN,
};

/// The stories and acceptance criteria of a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Stories, in declaration order.
    pub stories: Vec<Story>,
    /// Acceptance criteria, in document order.
    pub criteria: Vec<AcceptanceCriterion>,
}

impl ParsedDocument {
    /// Whether nothing was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.criteria.is_empty()
    }
}

/// Context carried from one block to the next during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkState {
    module: String,
    epic: Option<Epic>,
    /// Index of the current story in the output.
    story: Option<usize>,
}

impl WalkState {
    /// A fresh state for a document with the given module label.
    #[must_use]
    pub const fn new(module: String) -> Self {
        Self {
            module,
            epic: None,
            story: None,
        }
    }

    /// A fresh state whose module is resolved from the paragraphs of the
    /// document.
    ///
    /// The first `Module: <name>` declaration anywhere in the non-blank
    /// paragraph text wins; without one the module is `Unknown`.
    #[must_use]
    pub fn for_blocks(blocks: &[Block]) -> Self {
        let text = blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(text) => Some(text.trim()),
                Block::Table(_) => None,
            })
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Self::new(patterns::find_module(&text).unwrap_or_else(|| UNKNOWN.to_string()))
    }

    /// The document module label.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The current epic, if one has been declared.
    #[must_use]
    pub const fn epic(&self) -> Option<&Epic> {
        self.epic.as_ref()
    }

    /// The current story within `document`, if one has been declared.
    #[must_use]
    pub fn current_story<'a>(&self, document: &'a ParsedDocument) -> Option<&'a Story> {
        self.story.and_then(|index| document.stories.get(index))
    }

    /// Advances the walk by one block, appending to `document`.
    ///
    /// A criteria table is attached to the current story as found in
    /// `document`. When that story is not there the table is skipped.
    pub fn step(&mut self, block: &Block, extractor: &Extractor, document: &mut ParsedDocument) {
        match block {
            Block::Paragraph(text) => self.paragraph(text, document),
            Block::Table(table) => self.table(table, extractor, document),
        }
    }

    fn paragraph(&mut self, text: &str, document: &mut ParsedDocument) {
        let line = text.trim();
        if line.is_empty() {
            return;
        }

        if let Some(epic) = patterns::match_epic(line) {
            debug!(epic = %epic, "epic declared");
            self.epic = Some(epic);
            return;
        }

        if let Some(StoryDeclaration { id, title }) = patterns::match_story(line) {
            let epic = self
                .epic
                .as_ref()
                .map_or_else(|| UNKNOWN.to_string(), ToString::to_string);
            debug!(story = %id, epic = %epic, "story declared");
            document
                .stories
                .push(Story::new(self.module.clone(), epic, id, title));
            self.story = Some(document.stories.len() - 1);
        }
    }

    fn table(&self, table: &TableBlock, extractor: &Extractor, document: &mut ParsedDocument) {
        let Some(index) = self.story else {
            trace!(rows = table.len(), "skipping table before any story");
            return;
        };

        let Some(header_row) = extractor.classifier().header_row(table) else {
            trace!(rows = table.len(), "skipping table without criteria headers");
            return;
        };

        let Some(story) = document.stories.get(index) else {
            trace!(rows = table.len(), index, "skipping table whose story is not in this document");
            return;
        };
        let criteria: Vec<_> = rows::criteria(table, header_row, extractor.aliases())
            .map(|entry| AcceptanceCriterion {
                module: story.module.clone(),
                epic: story.epic.clone(),
                story_id: story.id.clone(),
                story_title: story.title.clone(),
                number: entry.number,
                scenario: entry.scenario,
            })
            .collect();
        let count = rows::count_rows(table, header_row);

        debug!(
            story = %story.id,
            header_row,
            rows = count,
            extracted = criteria.len(),
            "acceptance criteria table"
        );

        if let Some(story) = document.stories.get_mut(index) {
            story.criteria_count += count;
        }
        document.criteria.extend(criteria);
    }
}

/// Walks the blocks of one document.
///
/// A document without any paragraph yields nothing.
pub(super) fn walk(blocks: &[Block], extractor: &Extractor) -> ParsedDocument {
    let mut document = ParsedDocument::default();
    if !blocks
        .iter()
        .any(|block| matches!(block, Block::Paragraph(_)))
    {
        return document;
    }

    let mut state = WalkState::for_blocks(blocks);
    for block in blocks {
        state.step(block, extractor, &mut document);
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Block {
        Block::table(
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        )
    }

    fn walk(blocks: &[Block]) -> ParsedDocument {
        super::walk(blocks, &Extractor::default())
    }

    #[test]
    fn payments_scenario() {
        let blocks = vec![
            Block::paragraph("Module: Payments"),
            Block::paragraph("Epic 1: Payments"),
            Block::paragraph("User Story 1: Add UPI option"),
            table(&[
                &["Sr. No", "Scenario", "Acceptance Criteria"],
                &["1.1", "Navigate to Payments", "Given... When... Then..."],
            ]),
        ];

        let document = walk(&blocks);

        assert_eq!(document.stories.len(), 1);
        let story = &document.stories[0];
        assert_eq!(story.module, "Payments");
        assert_eq!(story.epic, "1: Payments");
        assert_eq!(story.id.as_str(), "1");
        assert_eq!(story.title, "Add UPI option");
        assert_eq!(story.criteria_count, 1);

        assert_eq!(document.criteria.len(), 1);
        let criterion = &document.criteria[0];
        assert_eq!(criterion.number, "1.1");
        assert_eq!(criterion.scenario, "Navigate to Payments");
        assert_eq!(criterion.story_title, "Add UPI option");
        assert_eq!(criterion.epic, "1: Payments");
    }

    #[test]
    fn tables_without_keywords_contribute_nothing() {
        let blocks = vec![
            table(&[&["Foo", "Bar"], &["1", "2"]]),
            Block::paragraph("Story 1: Login"),
            table(&[&["Foo", "Bar"], &["1", "2"]]),
        ];

        let document = walk(&blocks);
        assert_eq!(document.stories[0].criteria_count, 0);
        assert!(document.criteria.is_empty());
    }

    #[test]
    fn blank_row_after_header_is_not_counted() {
        let blocks = vec![
            Block::paragraph("Story 1: Login"),
            table(&[
                &["AC #", "Scenario"],
                &["", ""],
                &["1", "Valid password"],
                &["2", "Invalid password"],
            ]),
        ];

        let document = walk(&blocks);
        assert_eq!(document.stories[0].criteria_count, 2);
        assert_eq!(document.criteria.len(), 2);
        assert_eq!(document.criteria[1].scenario, "Invalid password");
    }

    #[test]
    fn tables_before_any_story_are_orphaned() {
        let blocks = vec![
            Block::paragraph("Epic 1: Accounts"),
            table(&[&["AC #", "Scenario"], &["1", "Orphan"]]),
            Block::paragraph("Story 1: Login"),
        ];

        let document = walk(&blocks);
        assert_eq!(document.stories[0].criteria_count, 0);
        assert!(document.criteria.is_empty());
    }

    #[test]
    fn stories_before_any_epic_are_unknown() {
        let blocks = vec![
            Block::paragraph("Story 1: Login"),
            Block::paragraph("Epic 2 - Wallet"),
            Block::paragraph("Story 2: Top up"),
        ];

        let document = walk(&blocks);
        assert_eq!(document.stories[0].epic, UNKNOWN);
        assert_eq!(document.stories[0].module, UNKNOWN);
        assert_eq!(document.stories[1].epic, "2: Wallet");
    }

    #[test]
    fn each_table_belongs_to_the_latest_story() {
        let blocks = vec![
            Block::paragraph("Story 1: Login"),
            table(&[&["AC #", "Scenario"], &["1", "a"], &["2", "b"]]),
            Block::paragraph("Some narrative text between stories."),
            Block::paragraph("Story 2: Logout"),
            table(&[&["AC #", "Scenario"], &["1", "c"]]),
            table(&[&["Criteria"], &["d"]]),
        ];

        let document = walk(&blocks);
        let counts: Vec<_> = document.stories.iter().map(|s| s.criteria_count).collect();
        assert_eq!(counts, [2, 2]);

        let owners: Vec<_> = document
            .criteria
            .iter()
            .map(|c| (c.story_id.as_str(), c.scenario.as_str()))
            .collect();
        assert_eq!(owners, [("1", "a"), ("1", "b"), ("2", "c"), ("2", "d")]);
    }

    #[test]
    fn module_declared_late_still_applies() {
        let blocks = vec![
            Block::paragraph("Story 1: Login"),
            Block::paragraph("Module: Identity"),
        ];

        let document = walk(&blocks);
        assert_eq!(document.stories[0].module, "Identity");
    }

    #[test]
    fn repeated_story_ids_are_kept() {
        let blocks = vec![
            Block::paragraph("Story 1: First"),
            Block::paragraph("Story 1: Again"),
        ];

        let document = walk(&blocks);
        assert_eq!(document.stories.len(), 2);
        assert_eq!(document.stories[1].title, "Again");
    }

    #[test]
    fn documents_without_paragraphs_are_empty() {
        let document = walk(&[table(&[&["AC #", "Scenario"], &["1", "a"]])]);
        assert!(document.is_empty());
        assert!(walk(&[]).is_empty());
    }

    #[test]
    fn state_can_be_stepped_directly() {
        let extractor = Extractor::default();
        let mut document = ParsedDocument::default();
        let mut state = WalkState::new("Billing".to_string());

        state.step(&Block::paragraph("   "), &extractor, &mut document);
        assert!(state.epic().is_none());

        state.step(&Block::paragraph("Epic 3: Invoices"), &extractor, &mut document);
        assert_eq!(state.epic().map(ToString::to_string).as_deref(), Some("3: Invoices"));
        assert!(state.current_story(&document).is_none());

        state.step(&Block::paragraph("Story 3.1: Send invoice"), &extractor, &mut document);
        let story = state.current_story(&document).unwrap();
        assert_eq!(story.module, "Billing");
        assert_eq!(story.id.as_str(), "3.1");
        assert_eq!(state.module(), "Billing");
    }

    #[test]
    fn table_for_a_story_in_another_document_is_skipped() {
        let extractor = Extractor::default();
        let mut first = ParsedDocument::default();
        let mut second = ParsedDocument::default();
        let mut state = WalkState::new("Billing".to_string());

        state.step(&Block::paragraph("Story 1: Send invoice"), &extractor, &mut first);
        state.step(
            &table(&[&["AC #", "Scenario"], &["1", "Emailed"]]),
            &extractor,
            &mut second,
        );

        assert!(second.is_empty());
        assert!(state.current_story(&second).is_none());
        assert_eq!(first.stories[0].criteria_count, 0);
        assert!(first.criteria.is_empty());
    }
}
