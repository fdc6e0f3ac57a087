//! XLSX encoding and decoding of [`SheetRow`] tables.
//!
//! Decoding locates columns by header name, so files whose columns were
//! reordered by hand still load. A missing sheet falls back to the first one.

use crate::error::{SpreadsheetError, SpreadsheetErrorExt};
use crate::row::{COLUMNS, SheetRow};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Cursor;
use tracing::warn;

/// Longest string Excel stores in a single cell, counted in characters.
pub(crate) const MAX_CELL_CHARS: usize = 32_767;

const COLUMN_WIDTHS: [f64; 7] = [24.0, 8.0, 32.0, 12.0, 20.0, 24.0, 28.0];

pub(crate) fn encode(sheet_name: &str, rows: &[SheetRow]) -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).context("Naming worksheet")?;

    for (col, (title, width)) in (0u16..).zip(COLUMNS.iter().zip(COLUMN_WIDTHS)) {
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, width)?;
    }

    for (row_idx, row) in (1u32..).zip(rows) {
        for (col, text) in row.text_cells() {
            sheet.write_string(row_idx, col, clamp_cell(row_idx, col, text))?;
        }
        match i32::try_from(row.age) {
            Ok(age) => sheet.write_number(row_idx, 1, f64::from(age))?,
            Err(_) => sheet.write_string(row_idx, 1, row.age.to_string())?,
        };
    }

    workbook.save_to_buffer().context("Serializing workbook")
}

fn clamp_cell(row: u32, col: u16, text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(row, column = COLUMNS[usize::from(col)], "Cell exceeds the Excel limit; truncated");
            &text[..cut]
        },
        None => text,
    }
}

pub(crate) fn decode(sheet_name: &str, bytes: Vec<u8>) -> Result<Vec<SheetRow>, SpreadsheetError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;

    let target = if workbook.sheet_names().iter().any(|name| name == sheet_name) {
        sheet_name.to_owned()
    } else {
        match workbook.sheet_names().first() {
            Some(first) => first.clone(),
            None => return Ok(Vec::new()),
        }
    };

    let range = workbook.worksheet_range(&target).context(format!("Reading sheet {target}"))?;
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let positions = COLUMNS.map(|name| header.iter().position(|cell| cell_text(cell) == name));

    Ok(rows
        .filter(|cells| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|cells| {
            let text = |idx: usize| {
                positions[idx].and_then(|pos| cells.get(pos)).map(cell_text).unwrap_or_default()
            };
            SheetRow {
                full_name: text(0),
                age: positions[1].and_then(|pos| cells.get(pos)).map_or(0, cell_int),
                email: text(2),
                country: text(3),
                state: text(4),
                industry: text(5),
                registration_date: text(6),
            }
        })
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cell_int(cell: &Data) -> i64 {
    match cell {
        Data::Int(i) => *i,
        Data::Float(f) if f.is_finite() => f.trunc() as i64,
        Data::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}
