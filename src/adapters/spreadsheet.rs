use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Spreadsheet text past this many characters is cut off.
pub const MAX_SPREADSHEET_CHARS: usize = 200_000;
const TRUNCATION_MARKER: &str = "\n... (Content Truncated) ...";

/// One worksheet as rows of display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Turns workbook bytes into sheets of cell text.
///
/// Injected into [`InputAdapter`](super::InputAdapter) so the rest of the
/// crate does not depend on a particular workbook library.
pub trait SpreadsheetDecoder: Send + Sync + std::fmt::Debug {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Vec<Sheet>>;
}

/// Default decoder backed by calamine (xlsx, xlsm, xlsb, xls, ods).
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineDecoder;

impl SpreadsheetDecoder for CalamineDecoder {
    fn decode(&self, bytes: &[u8]) -> anyhow::Result<Vec<Sheet>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let names = workbook.sheet_names();

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook.worksheet_range(&name)?;
            let rows = range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();
            sheets.push(Sheet { name, rows });
        }
        Ok(sheets)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Flatten sheets into the pipe-delimited text sent to the model.
///
/// ```text
/// --- DOCUMENT START: quote.xlsx ---
///
/// [SHEET: 견적]
/// | 구분 | 내역 | 금액 |
/// ```
pub fn sheets_to_text(file_name: &str, sheets: &[Sheet]) -> String {
    let mut text = format!("--- DOCUMENT START: {file_name} ---\n");

    for sheet in sheets.iter().filter(|sheet| !sheet.rows.is_empty()) {
        text.push_str(&format!("\n[SHEET: {}]\n", sheet.name));
        for row in &sheet.rows {
            let cells: Vec<String> = row.iter().map(|cell| collapse_newlines(cell)).collect();
            text.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }

    truncate_chars(text, MAX_SPREADSHEET_CHARS)
}

fn collapse_newlines(cell: &str) -> String {
    cell.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn truncate_chars(text: String, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text,
    }
}
