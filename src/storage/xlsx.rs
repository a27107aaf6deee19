//! A minimal `.xlsx` writer.
//!
//! Each table is written as a single-sheet workbook. Text cells are stored as
//! inline strings and counts as numbers, so the package needs no shared
//! string table.

use std::{
    fmt::Write as _,
    io::{Cursor, Seek, Write},
};

use quick_xml::escape::escape;
use zip::{ZipWriter, write::SimpleFileOptions};

use super::ExportError;
use crate::domain::{CellValue, Record, Table};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Writes a table as a single-sheet workbook named after the record type.
///
/// Returns the underlying writer once the package is complete.
///
/// # Errors
///
/// Returns an error if the container cannot be written.
pub fn write_xlsx<R: Record, W: Write + Seek>(
    table: &Table<R>,
    writer: W,
) -> Result<W, ExportError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("xl/workbook.xml", workbook_xml(R::SHEET)),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
        ("xl/styles.xml", STYLES.to_string()),
        ("xl/worksheets/sheet1.xml", sheet_xml(table)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?)
}

/// Writes a table to an in-memory workbook.
///
/// # Errors
///
/// Returns an error if the container cannot be written.
pub fn to_xlsx_bytes<R: Record>(table: &Table<R>) -> Result<Vec<u8>, ExportError> {
    Ok(write_xlsx(table, Cursor::new(Vec::new()))?.into_inner())
}

fn workbook_xml(sheet: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(sheet)
    )
}

fn sheet_xml<R: Record>(table: &Table<R>) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{MAIN_NS}"><sheetData>"#
    );

    let header = R::COLUMNS.iter().copied().map(CellValue::Text);
    push_row(&mut xml, 1, header);
    for (index, row) in table.iter().enumerate() {
        push_row(&mut xml, index + 2, row.cells());
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<'a>(xml: &mut String, number: usize, cells: impl IntoIterator<Item = CellValue<'a>>) {
    let _ = write!(xml, r#"<row r="{number}">"#);
    for (column, cell) in cells.into_iter().enumerate() {
        let reference = format!("{}{number}", column_name(column));
        match cell {
            CellValue::Text("") => {}
            CellValue::Text(text) => {
                let _ = write!(
                    xml,
                    r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    escape(&xml_safe(text))
                );
            }
            CellValue::Number(value) => {
                let _ = write!(xml, r#"<c r="{reference}"><v>{value}</v></c>"#);
            }
        }
    }
    xml.push_str("</row>");
}

/// Drops characters that XML 1.0 cannot represent.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Spreadsheet column name for a zero-based index: `A`, ..., `Z`, `AA`, ...
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

#[cfg(test)]
mod tests {
    use calamine::{Reader, Xlsx, open_workbook_from_rs};

    use super::*;
    use crate::domain::{CriteriaTable, CriterionRow, StoriesTable, StoryId, StoryRow};

    fn read_back(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(6), "G");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn stories_sheet_reads_back() {
        let table: StoriesTable = vec![StoryRow {
            module: "Payments & Billing".to_string(),
            epic: "1: Payments".to_string(),
            story_id: StoryId::new("1.2").unwrap(),
            story_title: "Add <UPI> option".to_string(),
            criteria_count: 3,
            source_file: "backlog.docx".to_string(),
        }]
        .into();

        let rows = read_back(to_xlsx_bytes(&table).unwrap(), "Stories");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], StoryRow::COLUMNS);
        assert_eq!(
            rows[1],
            [
                "Payments & Billing",
                "1: Payments",
                "1.2",
                "Add <UPI> option",
                "3",
                "backlog.docx"
            ]
        );
    }

    #[test]
    fn criteria_sheet_keeps_multiline_text_and_blank_cells() {
        let table: CriteriaTable = vec![CriterionRow {
            module: "Unknown".to_string(),
            epic: "Unknown".to_string(),
            story_id: StoryId::new("3").unwrap(),
            story_title: "Top up".to_string(),
            number: String::new(),
            scenario: "Given a card\nWhen I top up".to_string(),
            source_file: "wallet.docx".to_string(),
        }]
        .into();

        let rows = read_back(to_xlsx_bytes(&table).unwrap(), "Acceptance Criteria");

        assert_eq!(rows[0], CriterionRow::COLUMNS);
        assert_eq!(rows[1][4], "");
        assert_eq!(rows[1][5], "Given a card\nWhen I top up");
        assert_eq!(rows[1][6], "wallet.docx");
    }

    #[test]
    fn empty_table_has_header_only() {
        let rows = read_back(to_xlsx_bytes(&StoriesTable::new()).unwrap(), "Stories");
        assert_eq!(rows, vec![StoryRow::COLUMNS.iter().map(ToString::to_string).collect::<Vec<_>>()]);
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(xml_safe("a\u{1}b\tc\n"), "ab\tc\n");
    }
}
