//! Domain models for backlog extraction.
//!
//! This module contains the core domain types: stories, epics and acceptance
//! criteria, the output tables they are flattened into, the pattern matchers
//! that recognise declarations and the header canonicalizer.

/// Story, epic and acceptance criterion records.
pub mod story;
pub use story::{AcceptanceCriterion, Epic, InvalidStoryId, Story, StoryId};

/// Output tables and their row types.
pub mod table;
pub use table::{CellValue, CriteriaTable, CriterionRow, Record, StoriesTable, StoryRow, Table};

mod config;
pub use config::Config;

/// Canonicalization of acceptance criteria table headers.
pub mod header;
pub use header::HeaderAliases;

/// Recognisers for module, epic and story declaration lines.
pub mod patterns;
