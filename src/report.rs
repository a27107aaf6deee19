//! Filtering and summary metrics over extracted tables.

use std::collections::HashSet;

use crate::{CriteriaTable, StoriesTable, StoryRow};

/// Narrows the stories table, and the criteria with it.
///
/// Every set field must match; an empty filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Exact epic label.
    pub epic: Option<String>,
    /// Exact source file name.
    pub source_file: Option<String>,
    /// Case-insensitive substring of the story title.
    pub keyword: Option<String>,
}

impl Filter {
    /// Whether no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.epic.is_none() && self.source_file.is_none() && self.keyword_lowercase().is_none()
    }

    /// Whether a story row passes the filter.
    #[must_use]
    pub fn matches(&self, story: &StoryRow) -> bool {
        let keyword = self.keyword_lowercase();
        self.epic.as_ref().is_none_or(|epic| &story.epic == epic)
            && self
                .source_file
                .as_ref()
                .is_none_or(|source| &story.source_file == source)
            && keyword.is_none_or(|keyword| story.story_title.to_lowercase().contains(&keyword))
    }

    /// Applies the filter to both tables.
    ///
    /// Criteria are kept when their (source file, story id) pair belongs to a
    /// story that passed the filter.
    #[must_use]
    pub fn apply(
        &self,
        stories: &StoriesTable,
        criteria: &CriteriaTable,
    ) -> (StoriesTable, CriteriaTable) {
        if self.is_empty() {
            return (stories.clone(), criteria.clone());
        }

        let stories = stories.filtered(|story| self.matches(story));
        let kept: HashSet<_> = stories
            .iter()
            .map(|story| (story.source_file.as_str(), story.story_id.as_str()))
            .collect();
        let criteria = criteria.filtered(|criterion| {
            kept.contains(&(criterion.source_file.as_str(), criterion.story_id.as_str()))
        });

        (stories, criteria)
    }

    fn keyword_lowercase(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_lowercase)
    }
}

/// Headline metrics for the stories view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorySummary {
    /// Number of story rows.
    pub stories: usize,
    /// Distinct epic labels.
    pub epics: usize,
    /// Number of acceptance criteria rows.
    pub criteria: usize,
    /// Distinct module labels.
    pub modules: usize,
    /// Criteria rows per story, or zero without stories.
    pub avg_criteria_per_story: f64,
}

impl StorySummary {
    /// Computes the metrics for a (possibly filtered) pair of tables.
    #[must_use]
    pub fn new(stories: &StoriesTable, criteria: &CriteriaTable) -> Self {
        Self {
            stories: stories.len(),
            epics: distinct(stories.iter().map(|story| story.epic.as_str())),
            criteria: criteria.len(),
            modules: distinct(stories.iter().map(|story| story.module.as_str())),
            avg_criteria_per_story: ratio(criteria.len(), stories.len()),
        }
    }
}

/// Headline metrics for the acceptance criteria view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriteriaSummary {
    /// Number of criteria rows.
    pub criteria: usize,
    /// Distinct epic labels.
    pub epics: usize,
    /// Distinct stories, identified by source file and story id.
    pub stories: usize,
    /// Distinct module labels.
    pub modules: usize,
    /// Distinct source files.
    pub files: usize,
}

impl CriteriaSummary {
    /// Computes the metrics for a (possibly filtered) criteria table.
    #[must_use]
    pub fn new(criteria: &CriteriaTable) -> Self {
        Self {
            criteria: criteria.len(),
            epics: distinct(criteria.iter().map(|row| row.epic.as_str())),
            stories: distinct(
                criteria
                    .iter()
                    .map(|row| (row.source_file.as_str(), row.story_id.as_str())),
            ),
            modules: distinct(criteria.iter().map(|row| row.module.as_str())),
            files: distinct(criteria.iter().map(|row| row.source_file.as_str())),
        }
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
// Row counts stay far below 2^52, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
const fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn distinct<T: Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> usize {
    values.collect::<HashSet<_>>().len()
}
