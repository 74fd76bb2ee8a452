//! CSV assembly for tabular exports.
//!
//! Exports are built as a header row of field names plus one row per record.
//! Missing values render as empty cells; a failed cell never aborts the
//! export.

use crate::types::Date;

/// Quote a single CSV cell per RFC 4180 when it contains a delimiter,
/// quote, or newline.
fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Assemble a CSV document from a header and rows.
///
/// Rows shorter than the header are padded with empty cells so the column
/// grid stays rectangular.
pub fn csv_document(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();

    let header_line: Vec<String> = header.iter().map(|h| escape_cell(h)).collect();
    out.push_str(&header_line.join(","));
    out.push('\n');

    for row in rows {
        let mut cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        while cells.len() < header.len() {
            cells.push(String::new());
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    out
}

/// Export filename for a given day: `lastmile_<ISO-date>.csv`.
pub fn export_filename(today: Date) -> String {
    format!("lastmile_{today}.csv")
}
