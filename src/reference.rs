//! Reference map loading
//!
//! The reference map is the curated table the matcher is fitted on:
//! one row per tariff with its SNOMED code and description. It can be a
//! JSON array of records or a spreadsheet whose first sheet carries the
//! same three headers.
//!
//! Rows missing any of the three values are dropped, and when a tariff
//! name appears more than once the last row wins.

use crate::error::{MapperError, Result};
use crate::workbook::{self, SheetTable};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

pub const TARIFF_NAME_COLUMN: &str = "tariff name";
pub const SNOMED_CODE_COLUMN: &str = "snomed code";
pub const SNOMED_DESCRIPTION_COLUMN: &str = "snomed description";

/// One reference tariff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub tariff_name: String,
    pub snomed_code: String,
    pub snomed_description: String,
}

/// A reference row before missing values are dropped
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub tariff_name: Option<String>,
    pub snomed_code: Option<String>,
    pub snomed_description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceMap {
    /// Load from `.json` or a spreadsheet, chosen by extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MapperError::FileNotFound(path.display().to_string()));
        }

        let file_name = path.to_string_lossy();
        let map = match workbook::extension_of(&file_name).as_deref() {
            Some("json") => {
                let content = std::fs::read_to_string(path)?;
                Self::from_json_str(&content)?
            }
            _ if workbook::is_spreadsheet(&file_name) => {
                Self::from_sheet(&workbook::read_sheet_from_path(path)?)?
            }
            _ => {
                return Err(MapperError::InvalidReference(format!(
                    "unsupported reference format: {}",
                    path.display()
                )))
            }
        };

        if map.is_empty() {
            return Err(MapperError::InvalidReference(format!(
                "no usable rows in {}",
                path.display()
            )));
        }
        Ok(map)
    }

    /// Parse a JSON array of records keyed by the column names
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| MapperError::InvalidReference(format!("JSON parse error: {}", e)))?;
        let records = value
            .as_array()
            .ok_or_else(|| MapperError::InvalidReference("expected a JSON array of records".into()))?;

        let raw = records.iter().map(|record| {
            let mut fields: HashMap<String, &Value> = HashMap::new();
            if let Some(object) = record.as_object() {
                for (key, value) in object {
                    fields.insert(key.trim().to_lowercase(), value);
                }
            }
            RawRecord {
                tariff_name: fields.get(TARIFF_NAME_COLUMN).and_then(|v| json_text(v)),
                snomed_code: fields.get(SNOMED_CODE_COLUMN).and_then(|v| json_text(v)),
                snomed_description: fields.get(SNOMED_DESCRIPTION_COLUMN).and_then(|v| json_text(v)),
            }
        });

        Ok(Self::from_records(raw))
    }

    /// Read the three columns from a sheet (blank cells count as missing)
    pub fn from_sheet(table: &SheetTable) -> Result<Self> {
        let column = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| MapperError::InvalidReference(format!("missing column '{}'", name)))
        };
        let name_col = column(TARIFF_NAME_COLUMN)?;
        let code_col = column(SNOMED_CODE_COLUMN)?;
        let desc_col = column(SNOMED_DESCRIPTION_COLUMN)?;

        let non_blank = |row: &[String], col: usize| {
            let text = SheetTable::cell(row, col);
            (!text.is_empty()).then(|| text.to_string())
        };

        let raw = table.rows.iter().map(|row| RawRecord {
            tariff_name: non_blank(row, name_col),
            snomed_code: non_blank(row, code_col),
            snomed_description: non_blank(row, desc_col),
        });

        Ok(Self::from_records(raw))
    }

    /// Drop incomplete rows and keep the last row per tariff name
    pub fn from_records(records: impl IntoIterator<Item = RawRecord>) -> Self {
        let complete: Vec<ReferenceEntry> = records
            .into_iter()
            .filter_map(|r| {
                Some(ReferenceEntry {
                    tariff_name: r.tariff_name?,
                    snomed_code: normalize_code(&r.snomed_code?),
                    snomed_description: r.snomed_description?,
                })
            })
            .collect();

        let mut last_index: HashMap<&str, usize> = HashMap::new();
        for (i, entry) in complete.iter().enumerate() {
            last_index.insert(entry.tariff_name.as_str(), i);
        }

        let entries = complete
            .iter()
            .enumerate()
            .filter(|(i, entry)| last_index.get(entry.tariff_name.as_str()) == Some(i))
            .map(|(_, entry)| entry.clone())
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Render numeric codes as integers ("22298006.0" -> "22298006")
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.parse::<u64>().is_ok() {
        return trimmed.to_string();
    }
    if let Some(int_part) = trimmed.strip_suffix(".0") {
        if int_part.parse::<u64>().is_ok() {
            return int_part.to_string();
        }
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, code: &str, desc: &str) -> RawRecord {
        RawRecord {
            tariff_name: Some(name.into()),
            snomed_code: Some(code.into()),
            snomed_description: Some(desc.into()),
        }
    }

    #[test]
    fn test_duplicates_keep_last() {
        let map = ReferenceMap::from_records(vec![
            record("Full blood count", "26604007", "old"),
            record("Chest x-ray", "399208008", "Chest X-ray"),
            record("Full blood count", "26604007", "Complete blood count"),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.entries()[0].tariff_name, "Chest x-ray");
        assert_eq!(map.entries()[1].tariff_name, "Full blood count");
        assert_eq!(map.entries()[1].snomed_description, "Complete blood count");
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let map = ReferenceMap::from_records(vec![
            RawRecord {
                tariff_name: Some("Ultrasound".into()),
                snomed_code: None,
                snomed_description: Some("Ultrasonography".into()),
            },
            record("Urinalysis", "27171005", "Urinalysis"),
        ]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries()[0].tariff_name, "Urinalysis");
    }

    #[test]
    fn test_from_json_records() {
        let json = r#"[
            {"tariff name": "Malaria RDT", "snomed code": 117161000119108.0, "snomed description": "Malaria antigen test"},
            {"tariff name": "Consultation", "snomed code": "11429006", "snomed description": "Consultation"},
            {"tariff name": null, "snomed code": "1", "snomed description": "x"}
        ]"#;
        let map = ReferenceMap::from_json_str(json).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.entries()[1].snomed_code, "11429006");
    }

    #[test]
    fn test_from_json_rejects_object() {
        let err = ReferenceMap::from_json_str(r#"{"tariff name": "x"}"#).unwrap_err();
        assert!(matches!(err, MapperError::InvalidReference(_)));
    }

    #[test]
    fn test_from_sheet_requires_columns() {
        let table = SheetTable {
            headers: vec!["tariff name".into(), "code".into()],
            rows: vec![vec!["Zinc".into(), "1".into()]],
        };
        let err = ReferenceMap::from_sheet(&table).unwrap_err();
        assert!(err.to_string().contains("snomed code"));
    }

    #[test]
    fn test_from_sheet_reads_rows() {
        let table = SheetTable {
            headers: vec!["Tariff Name".into(), "SNOMED Code".into(), "SNOMED Description".into()],
            rows: vec![
                vec!["X-ray hand".into(), "20192007".into(), "Radiography of hand".into()],
                vec!["".into(), "1".into(), "orphan".into()],
            ],
        };
        let map = ReferenceMap::from_sheet(&table).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.entries()[0].snomed_code, "20192007");
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("22298006"), "22298006");
        assert_eq!(normalize_code("22298006.0"), "22298006");
        assert_eq!(normalize_code(" 1.5 "), "1.5");
        assert_eq!(normalize_code("ABC-1"), "ABC-1");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ReferenceMap::load(Path::new("/nonexistent/reference_map.json")).unwrap_err();
        assert!(matches!(err, MapperError::FileNotFound(_)));
    }
}
