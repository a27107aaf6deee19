//! Reads the body of a `.docx` package into blocks.
//!
//! Only direct children of `w:body` are blocks. Cell text is the cell's own
//! paragraphs joined with newlines; merged cells are expanded so that every
//! row is aligned to the table grid.

use std::io::{Cursor, Read};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use zip::{ZipArchive, result::ZipError};

use crate::extract::Block;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word's limit on the number of columns in a table.
const MAX_GRID_COLUMNS: usize = 63;

/// Errors that can occur when reading a `.docx` document.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The bytes are not a zip container.
    #[error("not a readable .docx container: {0}")]
    Archive(#[from] ZipError),
    /// The container has no main document part.
    #[error("the container has no word/document.xml part")]
    MissingDocument,
    /// The main document part could not be inflated or is not UTF-8.
    #[error("failed to read word/document.xml: {0}")]
    Io(#[from] std::io::Error),
    /// The main document part is not well-formed XML.
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Reads the body blocks of a `.docx` document in authored order.
///
/// # Errors
///
/// Returns an error if the bytes are not a zip container, if the container
/// has no `word/document.xml` part, or if that part cannot be parsed.
pub fn read_blocks(bytes: &[u8]) -> Result<Vec<Block>, ReadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let xml = {
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            ZipError::FileNotFound => ReadError::MissingDocument,
            other => ReadError::Archive(other),
        })?;
        let mut content = String::new();
        part.read_to_string(&mut content)?;
        content
    };

    walk_body(&xml)
}

fn walk_body(xml: &str) -> Result<Vec<Block>, ReadError> {
    let mut reader = Reader::from_str(xml);
    // Whitespace inside w:t is significant.
    reader.trim_text(false);

    let mut body = BodyReader::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => body.start(&e),
            Event::Empty(e) => body.empty(&e),
            Event::Text(e) => body.text(&e.unescape()?),
            Event::End(_) => body.end(),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(body.blocks)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Body,
    Paragraph,
    Run,
    Text,
    Table,
    Grid,
    Row,
    Cell,
    CellProperties,
    Other,
}

impl Tag {
    fn of(e: &BytesStart<'_>) -> Self {
        match e.name().as_ref() {
            b"w:body" => Self::Body,
            b"w:p" => Self::Paragraph,
            b"w:r" => Self::Run,
            b"w:t" => Self::Text,
            b"w:tbl" => Self::Table,
            b"w:tblGrid" => Self::Grid,
            b"w:tr" => Self::Row,
            b"w:tc" => Self::Cell,
            b"w:tcPr" => Self::CellProperties,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum VerticalMerge {
    #[default]
    None,
    Restart,
    Continue,
}

/// Text of the paragraph currently being read.
#[derive(Debug)]
struct Capture {
    depth: usize,
    text: String,
}

#[derive(Debug)]
struct CellState {
    depth: usize,
    paragraphs: Vec<String>,
    span: usize,
    merge: VerticalMerge,
}

#[derive(Debug)]
struct RowState {
    depth: usize,
    cells: Vec<String>,
    cell: Option<CellState>,
}

#[derive(Debug)]
struct TableState {
    depth: usize,
    /// Number of `w:gridCol` entries, zero when the table declares no grid.
    grid_columns: usize,
    rows: Vec<Vec<String>>,
    row: Option<RowState>,
}

impl TableState {
    fn cell_mut(&mut self) -> Option<&mut CellState> {
        self.row.as_mut().and_then(|row| row.cell.as_mut())
    }

    /// The widest a row may grow: the declared grid, or Word's column limit.
    const fn width(&self) -> usize {
        if self.grid_columns == 0 {
            MAX_GRID_COLUMNS
        } else {
            self.grid_columns
        }
    }

    fn finish_cell(&mut self) {
        let width = self.width();
        let Some(row) = self.row.as_mut() else {
            return;
        };
        let Some(cell) = row.cell.take() else {
            return;
        };

        // A span never runs past the grid, but every cell keeps one column.
        let span = cell.span.min(width.saturating_sub(row.cells.len())).max(1);
        let text = cell.paragraphs.join("\n");
        let previous = self.rows.last();
        for _ in 0..span {
            let column = row.cells.len();
            let value = if cell.merge == VerticalMerge::Continue {
                previous
                    .and_then(|cells| cells.get(column))
                    .cloned()
                    .unwrap_or_default()
            } else {
                text.clone()
            };
            row.cells.push(value);
        }
    }
}

#[derive(Debug, Default)]
struct BodyReader {
    stack: Vec<Tag>,
    blocks: Vec<Block>,
    paragraph: Option<Capture>,
    table: Option<TableState>,
}

impl BodyReader {
    fn parent(&self) -> Option<Tag> {
        self.stack.last().copied()
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn in_body(&self) -> bool {
        self.parent() == Some(Tag::Body)
    }

    /// Whether an element at the current depth is a direct child of the cell
    /// being read.
    fn in_cell(&self) -> bool {
        let depth = self.depth();
        self.table
            .as_ref()
            .and_then(|table| table.row.as_ref())
            .and_then(|row| row.cell.as_ref())
            .is_some_and(|cell| cell.depth + 1 == depth)
    }

    /// Whether the innermost open paragraph is the one being captured.
    fn capturing(&self) -> bool {
        let Some(capture) = &self.paragraph else {
            return false;
        };
        self.stack.iter().rposition(|tag| *tag == Tag::Paragraph) == Some(capture.depth)
    }

    fn start(&mut self, e: &BytesStart<'_>) {
        let tag = Tag::of(e);
        let depth = self.depth();

        match tag {
            Tag::Paragraph if (self.in_body() && self.table.is_none()) || self.in_cell() => {
                self.paragraph = Some(Capture {
                    depth,
                    text: String::new(),
                });
            }
            Tag::Table if self.in_body() && self.table.is_none() => {
                self.table = Some(TableState {
                    depth,
                    grid_columns: 0,
                    rows: Vec::new(),
                    row: None,
                });
            }
            Tag::Row => {
                if let Some(table) = self.table.as_mut() {
                    if table.row.is_none() && table.depth + 1 == depth {
                        table.row = Some(RowState {
                            depth,
                            cells: Vec::new(),
                            cell: None,
                        });
                    }
                }
            }
            Tag::Cell => {
                if let Some(row) = self.table.as_mut().and_then(|table| table.row.as_mut()) {
                    if row.cell.is_none() && row.depth + 1 == depth {
                        row.cell = Some(CellState {
                            depth,
                            paragraphs: Vec::new(),
                            span: 1,
                            merge: VerticalMerge::None,
                        });
                    }
                }
            }
            _ => {}
        }

        self.stack.push(tag);
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        match e.name().as_ref() {
            b"w:p" if self.in_body() && self.table.is_none() => {
                self.blocks.push(Block::paragraph(String::new()));
            }
            b"w:p" if self.in_cell() => {
                if let Some(cell) = self.table.as_mut().and_then(TableState::cell_mut) {
                    cell.paragraphs.push(String::new());
                }
            }
            b"w:tab" => self.push_run_text("\t"),
            b"w:cr" => self.push_run_text("\n"),
            b"w:br" => {
                // Page and column breaks carry no text.
                let text_wrapping = attr(e, b"w:type").is_none_or(|kind| kind == "textWrapping");
                if text_wrapping {
                    self.push_run_text("\n");
                }
            }
            b"w:gridCol" if self.parent() == Some(Tag::Grid) => {
                let depth = self.depth();
                if let Some(table) = self.table.as_mut() {
                    if table.depth + 2 == depth {
                        table.grid_columns += 1;
                    }
                }
            }
            b"w:gridSpan" if self.parent() == Some(Tag::CellProperties) => {
                let span = attr(e, b"w:val").and_then(|value| value.parse::<usize>().ok());
                let depth = self.depth();
                if let (Some(span), Some(cell)) = (span, self.cell_at(depth - 1)) {
                    cell.span = span.clamp(1, MAX_GRID_COLUMNS);
                }
            }
            b"w:vMerge" if self.parent() == Some(Tag::CellProperties) => {
                let merge = match attr(e, b"w:val").as_deref() {
                    Some("restart") => VerticalMerge::Restart,
                    _ => VerticalMerge::Continue,
                };
                let depth = self.depth();
                if let Some(cell) = self.cell_at(depth - 1) {
                    cell.merge = merge;
                }
            }
            _ => {}
        }
    }

    /// The cell being read, if its properties element sits at `depth`.
    fn cell_at(&mut self, depth: usize) -> Option<&mut CellState> {
        self.table
            .as_mut()
            .and_then(TableState::cell_mut)
            .filter(|cell| cell.depth + 1 == depth)
    }

    fn push_run_text(&mut self, text: &str) {
        if self.parent() == Some(Tag::Run) && self.capturing() {
            if let Some(capture) = self.paragraph.as_mut() {
                capture.text.push_str(text);
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.parent() == Some(Tag::Text) && self.capturing() {
            if let Some(capture) = self.paragraph.as_mut() {
                capture.text.push_str(text);
            }
        }
    }

    fn end(&mut self) {
        let Some(tag) = self.stack.pop() else {
            return;
        };
        let depth = self.depth();

        match tag {
            Tag::Paragraph => self.finish_paragraph(depth),
            Tag::Cell => {
                if let Some(table) = self.table.as_mut() {
                    if table.cell_mut().is_some_and(|cell| cell.depth == depth) {
                        table.finish_cell();
                    }
                }
            }
            Tag::Row => {
                if let Some(table) = self.table.as_mut() {
                    if table.row.as_ref().is_some_and(|row| row.depth == depth) {
                        if let Some(row) = table.row.take() {
                            table.rows.push(row.cells);
                        }
                    }
                }
            }
            Tag::Table => {
                if self.table.as_ref().is_some_and(|table| table.depth == depth) {
                    if let Some(table) = self.table.take() {
                        self.blocks.push(Block::table(table.rows));
                    }
                }
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self, depth: usize) {
        if self
            .paragraph
            .as_ref()
            .is_none_or(|capture| capture.depth != depth)
        {
            return;
        }
        let Some(capture) = self.paragraph.take() else {
            return;
        };

        match self.table.as_mut() {
            Some(table) => {
                if let Some(cell) = table.cell_mut() {
                    cell.paragraphs.push(capture.text);
                }
            }
            None => self.blocks.push(Block::Paragraph(capture.text)),
        }
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}
