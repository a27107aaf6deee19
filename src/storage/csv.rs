use std::io::{BufRead, BufReader, Read, Write};

use super::ExportError;
use crate::domain::{Record, Table};

/// UTF-8 byte-order mark, so that spreadsheet applications detect the
/// encoding.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes a table as comma-separated text.
///
/// The output starts with a UTF-8 byte-order mark and always contains the
/// header row, even when the table is empty.
///
/// # Errors
///
/// Returns an error if a row cannot be serialized or the writer fails.
pub fn write_csv<R: Record, W: Write>(table: &Table<R>, mut writer: W) -> Result<(), ExportError> {
    writer.write_all(BOM)?;

    let mut csv = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(R::COLUMNS)?;
    for row in table {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes a table to an in-memory buffer.
///
/// # Errors
///
/// Returns an error if a row cannot be serialized.
pub fn to_csv_bytes<R: Record>(table: &Table<R>) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    write_csv(table, &mut bytes)?;
    Ok(bytes)
}

/// Reads a table back from comma-separated text.
///
/// A leading byte-order mark is skipped. Columns are matched by header name.
///
/// # Errors
///
/// Returns an error if the text is not valid delimited text or a row does not
/// match the record type.
pub fn read_csv<R: Record, Rd: Read>(reader: Rd) -> Result<Table<R>, ExportError> {
    let mut reader = BufReader::new(reader);
    if reader.fill_buf()?.starts_with(BOM) {
        reader.consume(BOM.len());
    }

    let mut csv = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    csv.deserialize()
        .collect::<Result<Vec<R>, _>>()
        .map(Table::from)
        .map_err(ExportError::from)
}
