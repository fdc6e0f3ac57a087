//! Append-only spreadsheet projection of waitlist registrations.
//!
//! The workbook holds a single sheet whose header row is [`COLUMNS`]. Rows are
//! only ever appended; each append decodes the whole file, adds the row and
//! replaces the file atomically (unique temp file, `fsync`, `rename`).
//!
//! Encoding and decoding are CPU-bound and run on the blocking thread pool.

mod builder;
mod codec;
mod engine;
mod error;
mod maintenance;
mod row;

pub use builder::{DEFAULT_FILE_NAME, DEFAULT_SHEET_NAME, SpreadsheetBuilder};
pub use engine::{Spreadsheet, SpreadsheetInner};
pub use error::{SpreadsheetError, SpreadsheetErrorExt};
pub use row::{COLUMNS, SheetRow, export_timestamp};

/// MIME type of the produced workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
