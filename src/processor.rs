//! Uploaded spreadsheet processing
//!
//! Reads the tariff column of the first sheet, counts duplicates, matches
//! each distinct name once and writes every row to an output workbook.

use crate::error::{MapperError, Result};
use crate::matcher::Matcher;
use crate::reference::TARIFF_NAME_COLUMN;
use crate::workbook::{self, SheetTable};
use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use snomed_mapper_common::{is_highlighted, TariffMatch};
use std::collections::HashMap;

pub const MATCHES_SHEET: &str = "Matches";
pub const SUMMARY_SHEET: &str = "Summary";

const OUTPUT_HEADERS: [&str; 6] = [
    "Input Name",
    "Matched Name",
    "SNOMED Code",
    "SNOMED Description",
    "Similarity Score",
    "Duplicate",
];

/// One row of the uploaded sheet with its match
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRow {
    pub tariff_match: TariffMatch,
    pub duplicate: bool,
}

/// Result of processing an upload
#[derive(Debug, Clone)]
pub struct ProcessedWorkbook {
    pub total_rows: usize,
    pub duplicated_rows: usize,
    pub rows: Vec<ProcessedRow>,
    /// Generated `.xlsx`
    pub bytes: Vec<u8>,
}

/// Process an uploaded file by name and content
pub fn process_upload(file_name: &str, bytes: &[u8], matcher: &Matcher) -> Result<ProcessedWorkbook> {
    if !workbook::is_spreadsheet(file_name) {
        return Err(MapperError::UnsupportedFile(file_name.to_string()));
    }
    let table = workbook::read_sheet_from_bytes(bytes)?;
    process_table(&table, matcher)
}

pub fn process_table(table: &SheetTable, matcher: &Matcher) -> Result<ProcessedWorkbook> {
    let name_col = table.column(TARIFF_NAME_COLUMN).unwrap_or(0);

    let names: Vec<&str> = table
        .rows
        .iter()
        .map(|row| SheetTable::cell(row, name_col).trim())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return Err(MapperError::EmptyWorkbook);
    }

    // normalised name -> index into `unique`
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<String> = Vec::new();
    let mut row_refs: Vec<(usize, bool)> = Vec::with_capacity(names.len());
    for name in &names {
        let key = name.to_lowercase();
        match seen.get(&key) {
            Some(&idx) => row_refs.push((idx, true)),
            None => {
                seen.insert(key, unique.len());
                row_refs.push((unique.len(), false));
                unique.push(name.to_string());
            }
        }
    }

    let matches = matcher.match_names(&unique)?;
    let rows: Vec<ProcessedRow> = names
        .iter()
        .zip(&row_refs)
        .map(|(name, &(idx, duplicate))| ProcessedRow {
            tariff_match: TariffMatch {
                input_name: name.to_string(),
                ..matches[idx].clone()
            },
            duplicate,
        })
        .collect();

    let total_rows = rows.len();
    let duplicated_rows = rows.iter().filter(|r| r.duplicate).count();
    let bytes = write_output(&rows, total_rows, duplicated_rows, unique.len())?;

    Ok(ProcessedWorkbook {
        total_rows,
        duplicated_rows,
        rows,
        bytes,
    })
}

fn xlsx_error(e: XlsxError) -> MapperError {
    MapperError::ExcelGeneration(e.to_string())
}

fn write_output(
    rows: &[ProcessedRow],
    total_rows: usize,
    duplicated_rows: usize,
    unique_names: usize,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new().set_bold().set_background_color(Color::RGB(0xD9E1F2));
    let percent_format = Format::new().set_num_format("0.00%");
    let highlight_format = Format::new()
        .set_num_format("0.00%")
        .set_background_color(Color::RGB(0xC6EFCE));

    let sheet = workbook.add_worksheet();
    sheet.set_name(MATCHES_SHEET).map_err(xlsx_error)?;
    for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx_error)?;
    }
    for (col, width) in [40.0, 40.0, 18.0, 50.0, 16.0, 12.0].into_iter().enumerate() {
        sheet.set_column_width(col as u16, width).map_err(xlsx_error)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let m = &row.tariff_match;
        sheet.write_string(r, 0, &m.input_name).map_err(xlsx_error)?;
        sheet.write_string(r, 1, &m.matched_name).map_err(xlsx_error)?;
        sheet.write_string(r, 2, &m.snomed_code).map_err(xlsx_error)?;
        sheet.write_string(r, 3, &m.snomed_description).map_err(xlsx_error)?;
        let score_format = if is_highlighted(m.similarity_score) {
            &highlight_format
        } else {
            &percent_format
        };
        sheet
            .write_number_with_format(r, 4, m.similarity_score, score_format)
            .map_err(xlsx_error)?;
        sheet
            .write_string(r, 5, if row.duplicate { "Yes" } else { "No" })
            .map_err(xlsx_error)?;
    }

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET).map_err(xlsx_error)?;
    summary.set_column_width(0, 24.0).map_err(xlsx_error)?;
    summary.set_column_width(1, 24.0).map_err(xlsx_error)?;
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let lines: [(&str, String); 4] = [
        ("Total rows", total_rows.to_string()),
        ("Duplicated rows", duplicated_rows.to_string()),
        ("Unique names", unique_names.to_string()),
        ("Generated at", generated_at),
    ];
    for (i, (label, value)) in lines.iter().enumerate() {
        let r = i as u32;
        summary
            .write_string_with_format(r, 0, *label, &header_format)
            .map_err(xlsx_error)?;
        summary.write_string(r, 1, value).map_err(xlsx_error)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}
