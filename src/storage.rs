/// Reading `.docx` containers into blocks.
pub mod docx;
pub use docx::{ReadError, read_blocks};

/// Delimited-text export.
pub mod csv;
/// Spreadsheet export.
pub mod xlsx;

use std::io;

/// Errors that can occur when exporting a table.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// An I/O error occurred.
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    /// The delimited-text writer or reader failed.
    #[error("delimited text error: {0}")]
    Csv(#[from] ::csv::Error),
    /// The spreadsheet container could not be written.
    #[error("failed to write spreadsheet container: {0}")]
    Zip(#[from] zip::result::ZipError),
}
