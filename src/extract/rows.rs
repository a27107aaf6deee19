use super::TableBlock;
use crate::domain::{
    HeaderAliases,
    header::{AC_NUMBER, ACCEPTANCE_CRITERIA, SCENARIO},
};

/// The fields extracted from one acceptance criteria row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionEntry {
    /// The criterion number, possibly empty.
    pub number: String,
    /// The scenario text, possibly empty.
    pub scenario: String,
}

/// Column positions of the canonical fields in a header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Columns {
    /// The `AC #` column.
    pub number: Option<usize>,
    /// The `Scenario` column.
    pub scenario: Option<usize>,
    /// The free-text `Acceptance Criteria` column.
    pub criteria: Option<usize>,
}

impl Columns {
    /// Resolves canonical columns from header cells; the first match wins.
    #[must_use]
    pub fn resolve(header: &[String], aliases: &HeaderAliases) -> Self {
        let canonical: Vec<String> = header.iter().map(|cell| aliases.canonicalize(cell)).collect();
        let find = |name: &str| canonical.iter().position(|header| header == name);
        Self {
            number: find(AC_NUMBER),
            scenario: find(SCENARIO),
            criteria: find(ACCEPTANCE_CRITERIA),
        }
    }
}

/// The index of the first data row after the header.
///
/// A blank separator row directly below the header is skipped. The result
/// never exceeds the row count.
#[must_use]
pub fn first_data_row(table: &TableBlock, header_row: usize) -> usize {
    let mut start = header_row + 1;
    if start < table.len() && table.row_is_blank(start) {
        start += 1;
    }
    start.min(table.len())
}

/// Counts the non-blank data rows of an acceptance criteria table.
#[must_use]
pub fn count_rows(table: &TableBlock, header_row: usize) -> usize {
    (first_data_row(table, header_row)..table.len())
        .filter(|&index| !table.row_is_blank(index))
        .count()
}

/// Extracts criterion entries from the data rows of an acceptance criteria
/// table.
///
/// Blank rows, and rows where both the number and the scenario come out
/// empty, are skipped.
pub fn criteria<'a>(
    table: &'a TableBlock,
    header_row: usize,
    aliases: &HeaderAliases,
) -> impl Iterator<Item = CriterionEntry> + use<'a> {
    let columns = table
        .row(header_row)
        .map(|header| Columns::resolve(header, aliases))
        .unwrap_or_default();
    let start = first_data_row(table, header_row);

    table.rows()[start..]
        .iter()
        .enumerate()
        .filter(move |(offset, _)| !table.row_is_blank(start + offset))
        .filter_map(move |(_, cells)| entry(cells, columns))
}

fn entry(cells: &[String], columns: Columns) -> Option<CriterionEntry> {
    let cell = |index: Option<usize>| {
        index
            .and_then(|index| cells.get(index))
            .map_or("", |text| text.trim())
    };

    let number = cell(columns.number);
    let mut scenario = cell(columns.scenario);
    if scenario.is_empty() {
        scenario = cell(columns.criteria);
    }

    if number.is_empty() && scenario.is_empty() {
        return None;
    }

    Some(CriterionEntry {
        number: number.to_string(),
        scenario: scenario.to_string(),
    })
}
