//! Wire types shared by the server, the native client and the web front end
//!
//! - TariffRequest / TariffResponse: `/api/v1/match`
//! - UploadResult: `/api/v1/process-excel`
//! - ErrorDetail: error body of every endpoint
//! - ResultRow: a match prepared for display

use serde::{Deserialize, Serialize};

/// Scores at or above this percentage are highlighted
pub const HIGHLIGHT_THRESHOLD_PERCENT: f64 = 70.0;

/// CSS class applied to highlighted score cells
pub const HIGHLIGHT_CLASS: &str = "highlight-green";

/// Request body of `/api/v1/match`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffRequest {
    pub tariff_names: Vec<String>,
}

/// One matched tariff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffMatch {
    pub input_name: String,
    pub matched_name: String,
    pub snomed_code: String,
    pub snomed_description: String,
    /// Cosine similarity in [0, 1]
    pub similarity_score: f64,
}

/// Response body of `/api/v1/match`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffResponse {
    pub results: Vec<TariffMatch>,
}

/// Response body of `/api/v1/process-excel`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub total_rows: usize,
    pub duplicated_rows: usize,
    pub file_id: String,
}

/// Error body returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

/// Response body of `/api/v1/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
}

/// A match row ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub input_name: String,
    pub matched_name: String,
    pub snomed_code: String,
    pub snomed_description: String,
    /// e.g. "87.50%"
    pub score_text: String,
    pub highlighted: bool,
}

impl ResultRow {
    /// CSS class for the score cell (empty when not highlighted)
    pub fn score_class(&self) -> &'static str {
        if self.highlighted {
            HIGHLIGHT_CLASS
        } else {
            ""
        }
    }
}

impl From<&TariffMatch> for ResultRow {
    fn from(m: &TariffMatch) -> Self {
        Self {
            input_name: m.input_name.clone(),
            matched_name: m.matched_name.clone(),
            snomed_code: m.snomed_code.clone(),
            snomed_description: m.snomed_description.clone(),
            score_text: format_score(m.similarity_score),
            highlighted: is_highlighted(m.similarity_score),
        }
    }
}

/// `score * 100` with two decimals and a trailing `%`
pub fn format_score(score: f64) -> String {
    // halves round up, not to even
    let percent = score * 100.0;
    format!("{:.2}%", (percent * 100.0).round() / 100.0)
}

pub fn is_highlighted(score: f64) -> bool {
    score * 100.0 >= HIGHLIGHT_THRESHOLD_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match(score: f64) -> TariffMatch {
        TariffMatch {
            input_name: "Paracetamol 500mg".to_string(),
            matched_name: "paracetamol 500mg tablet".to_string(),
            snomed_code: "322236009".to_string(),
            snomed_description: "Paracetamol 500 mg oral tablet".to_string(),
            similarity_score: score,
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0), "0.00%");
        assert_eq!(format_score(1.0), "100.00%");
        assert_eq!(format_score(0.875), "87.50%");
        assert_eq!(format_score(0.5), "50.00%");
    }

    #[test]
    fn test_format_score_rounds_halves_up() {
        assert_eq!(format_score(0.50125), "50.13%");
        assert_eq!(format_score(0.70625), "70.63%");
        assert_eq!(format_score(0.12125), "12.13%");
    }

    #[test]
    fn test_highlight_threshold() {
        assert!(is_highlighted(0.75));
        assert!(is_highlighted(0.95));
        assert!(!is_highlighted(0.6999));
        assert!(!is_highlighted(0.0));
    }

    #[test]
    fn test_result_row_from_match() {
        let row = ResultRow::from(&sample_match(0.8));
        assert_eq!(row.input_name, "Paracetamol 500mg");
        assert_eq!(row.snomed_code, "322236009");
        assert_eq!(row.score_text, "80.00%");
        assert!(row.highlighted);
        assert_eq!(row.score_class(), HIGHLIGHT_CLASS);

        let low = ResultRow::from(&sample_match(0.42));
        assert_eq!(low.score_text, "42.00%");
        assert_eq!(low.score_class(), "");
    }

    #[test]
    fn test_request_json_shape() {
        let request = TariffRequest {
            tariff_names: vec!["A".to_string(), "B".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "tariff_names": ["A", "B"] }));
    }

    #[test]
    fn test_error_detail_missing_field() {
        let detail: ErrorDetail = serde_json::from_str("{}").unwrap();
        assert_eq!(detail.detail, None);

        let detail: ErrorDetail = serde_json::from_str(r#"{"detail":"bad file"}"#).unwrap();
        assert_eq!(detail.detail.as_deref(), Some("bad file"));
    }
}
