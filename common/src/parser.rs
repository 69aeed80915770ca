//! Input and response parsing
//!
//! Pure helpers used by the controller, so each rule can be tested
//! without a transport or a document tree.

use crate::error::ApiError;
use crate::types::ErrorDetail;

/// Label shown next to the file picker when nothing is selected
pub const NO_FILE_LABEL: &str = "No file chosen";

/// Split text-area input into tariff names
///
/// Each line is trimmed and blank lines are dropped. Order is preserved.
///
/// # Examples
/// ```
/// use snomed_mapper_common::parse_tariff_names;
///
/// let names = parse_tariff_names("Paracetamol 500mg\n\nIbuprofen 200mg");
/// assert_eq!(names, vec!["Paracetamol 500mg", "Ibuprofen 200mg"]);
/// ```
pub fn parse_tariff_names(raw_text: &str) -> Vec<String> {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build an [`ApiError`] from a non-success response
///
/// The body is expected to be `{"detail": "..."}`; any other shape
/// yields an error without detail.
pub fn parse_error_body(status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorDetail>(body)
        .ok()
        .and_then(|d| d.detail);
    ApiError::Status { status, detail }
}

/// Label for the currently selected file
pub fn file_label(file_name: Option<&str>) -> String {
    file_name.unwrap_or(NO_FILE_LABEL).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_drops_blank_lines() {
        let names = parse_tariff_names("Paracetamol 500mg\n\nIbuprofen 200mg");
        assert_eq!(names, vec!["Paracetamol 500mg", "Ibuprofen 200mg"]);
    }

    #[test]
    fn test_parse_names_trims_and_keeps_order() {
        let names = parse_tariff_names("  Zinc  \r\n\t\n   \nAmoxicillin\nzinc");
        assert_eq!(names, vec!["Zinc", "Amoxicillin", "zinc"]);
    }

    #[test]
    fn test_parse_names_empty_input() {
        assert!(parse_tariff_names("").is_empty());
        assert!(parse_tariff_names("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_parse_error_body_with_detail() {
        let err = parse_error_body(400, r#"{"detail": "Only .xlsx files are supported"}"#);
        assert_eq!(
            err,
            ApiError::Status { status: 400, detail: Some("Only .xlsx files are supported".into()) }
        );
    }

    #[test]
    fn test_parse_error_body_unparseable() {
        assert_eq!(parse_error_body(502, "<html>Bad Gateway</html>").detail(), None);
        assert_eq!(parse_error_body(500, r#"{"error": "x"}"#).detail(), None);
        assert_eq!(parse_error_body(500, "").detail(), None);
    }

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Some("tariffs.xlsx")), "tariffs.xlsx");
        assert_eq!(file_label(None), NO_FILE_LABEL);
    }
}
