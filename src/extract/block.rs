/// One unit of a document body in authored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A body paragraph's text.
    Paragraph(String),
    /// A body table.
    Table(TableBlock),
}

impl Block {
    /// Creates a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(text.into())
    }

    /// Creates a table block from rows of cell texts.
    #[must_use]
    pub const fn table(rows: Vec<Vec<String>>) -> Self {
        Self::Table(TableBlock::new(rows))
    }
}

/// A table as ordered rows of cell texts.
///
/// Rows may have differing lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBlock {
    rows: Vec<Vec<String>>,
}

impl TableBlock {
    /// Creates a table from rows of cell texts.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The row at `index`, if present.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
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

    /// Whether every cell of the row at `index` is blank.
    ///
    /// Rows without cells and rows past the end count as blank.
    #[must_use]
    pub fn row_is_blank(&self, index: usize) -> bool {
        self.row(index)
            .is_none_or(|cells| cells.iter().all(|cell| cell.trim().is_empty()))
    }
}

impl From<Vec<Vec<String>>> for TableBlock {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}
