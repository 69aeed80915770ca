//! Spreadsheet reading (calamine)
//!
//! Both the reference map and uploaded files are read as "first worksheet,
//! header row + data rows of trimmed text cells".

use crate::error::{MapperError, Result};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;
use std::path::Path;

/// Extensions calamine can open
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// First worksheet as text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Index of the column whose header equals `name` (case-insensitive)
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Cell text, empty when the row is shorter than `col`
    pub fn cell(row: &[String], col: usize) -> &str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

pub fn is_spreadsheet(file_name: &str) -> bool {
    extension_of(file_name)
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

pub fn read_sheet_from_path(path: &Path) -> Result<SheetTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| MapperError::SpreadsheetRead(format!("{}: {}", path.display(), e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MapperError::SpreadsheetRead("the workbook has no worksheets".into()))?
        .map_err(|e| MapperError::SpreadsheetRead(e.to_string()))?;
    Ok(table_from_range(&range))
}

pub fn read_sheet_from_bytes(bytes: &[u8]) -> Result<SheetTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| MapperError::SpreadsheetRead(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| MapperError::SpreadsheetRead("the workbook has no worksheets".into()))?
        .map_err(|e| MapperError::SpreadsheetRead(e.to_string()))?;
    Ok(table_from_range(&range))
}

fn table_from_range(range: &Range<Data>) -> SheetTable {
    let mut rows_iter = range.rows();
    let headers = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return SheetTable::default(),
    };

    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|values| values.iter().any(|v| !v.is_empty()))
        .collect();

    SheetTable { headers, rows }
}

/// Cell text; whole floats lose their ".0" so numeric codes read as integers
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{:.0}", f)
        }
        _ => cell.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::Float(22298006.0)), "22298006");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::String("  Zinc  ".into())), "Zinc");
    }

    #[test]
    fn test_is_spreadsheet() {
        assert!(is_spreadsheet("tariffs.xlsx"));
        assert!(is_spreadsheet("TARIFFS.XLS"));
        assert!(!is_spreadsheet("tariffs.csv"));
        assert!(!is_spreadsheet("tariffs"));
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let table = SheetTable {
            headers: vec!["ID".into(), " Tariff Name ".into()],
            rows: vec![],
        };
        assert_eq!(table.column("tariff name"), Some(1));
        assert_eq!(table.column("snomed code"), None);
    }
}
