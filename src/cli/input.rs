//! Document selection and filtering shared by the subcommands.

use std::path::PathBuf;

use backlog::{
    BatchResult, Config, CriteriaTable, Extractor, StoriesTable, collect_documents, extract_paths,
    report::{Filter, StorySummary},
};

use super::terminal::Colorize;

#[derive(Debug, clap::Args)]
pub struct Input {
    /// Documents to read, or directories to search for `.docx` files
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Only stories of this epic (e.g. "1: Payments")
    #[arg(long)]
    epic: Option<String>,

    /// Only stories from this file
    #[arg(long = "source", value_name = "FILE")]
    source_file: Option<String>,

    /// Only stories whose title contains this text (case-insensitive)
    #[arg(long = "contains", value_name = "TEXT")]
    keyword: Option<String>,
}

/// The filtered tables of a batch.
pub struct Extracted {
    pub documents: usize,
    /// Metrics of the whole batch, before filtering.
    pub overall: StorySummary,
    pub stories: StoriesTable,
    pub criteria: CriteriaTable,
}

impl Input {
    /// Reads every selected document and applies the filter.
    ///
    /// Unreadable documents are reported on stderr. Returns `None` if the
    /// batch produced no rows at all.
    pub fn extract(&self, config: &Config) -> Option<Extracted> {
        let paths = collect_documents(&self.paths);
        if paths.is_empty() {
            println!("No .docx documents found.");
            return None;
        }

        let batch = extract_paths(&Extractor::new(config), &paths);
        report_failures(&batch);

        if batch.is_empty() {
            println!("No stories or acceptance criteria found.");
            return None;
        }

        let (stories, criteria) = self.filter().apply(&batch.stories, &batch.criteria);
        Some(Extracted {
            documents: paths.len() - batch.failures.len(),
            overall: StorySummary::new(&batch.stories, &batch.criteria),
            stories,
            criteria,
        })
    }

    fn filter(&self) -> Filter {
        Filter {
            epic: self.epic.clone(),
            source_file: self.source_file.clone(),
            keyword: self.keyword.clone(),
        }
    }
}

fn report_failures(batch: &BatchResult) {
    if batch.failures.is_empty() {
        return;
    }

    eprintln!(
        "{}",
        format!("Skipped {} unreadable document(s):", batch.failures.len()).warning()
    );
    for failure in &batch.failures {
        eprintln!("  - {}: {}", failure.name, failure.reason);
    }
}
