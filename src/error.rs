use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snomed_mapper_common::{ActionError, ErrorDetail};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid reference file: {0}")]
    InvalidReference(String),

    #[error("tariff_names list cannot be empty.")]
    EmptyNameList,

    #[error("Unsupported file type: {0}. Please upload an Excel file (.xlsx or .xls)")]
    UnsupportedFile(String),

    #[error("Could not read the spreadsheet: {0}")]
    SpreadsheetRead(String),

    #[error("No tariff names found in the uploaded file")]
    EmptyWorkbook,

    #[error("Excel generation error: {0}")]
    ExcelGeneration(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("File exceeds the {} upload limit", format_limit(*.0))]
    PayloadTooLarge(usize),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("File not found")]
    DownloadNotFound(String),

    #[error("API call error: {0}")]
    ApiCall(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{}", .0.user_message())]
    Action(#[from] ActionError),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapperError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            MapperError::EmptyNameList
            | MapperError::UnsupportedFile(_)
            | MapperError::SpreadsheetRead(_)
            | MapperError::EmptyWorkbook
            | MapperError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MapperError::DownloadNotFound(_) | MapperError::FileNotFound(_) => StatusCode::NOT_FOUND,
            MapperError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MapperError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MapperError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(ErrorDetail::new(self.to_string()))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;

/// "20 MB", or KB below a megabyte
fn format_limit(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB {
        format!("{} MB", bytes / MB)
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_list_detail() {
        let err = MapperError::EmptyNameList;
        assert_eq!(err.to_string(), "tariff_names list cannot be empty.");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            MapperError::DownloadNotFound("abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MapperError::ExcelGeneration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(MapperError::EmptyWorkbook.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_payload_too_large_detail() {
        let err = MapperError::PayloadTooLarge(20 * 1024 * 1024);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "File exceeds the 20 MB upload limit");
        assert_eq!(
            MapperError::PayloadTooLarge(1024).to_string(),
            "File exceeds the 1 KB upload limit"
        );
    }

    #[test]
    fn test_action_error_uses_user_message() {
        let err: MapperError = ActionError::from(snomed_mapper_common::InputError::EmptyNameList).into();
        assert_eq!(err.to_string(), "Please enter at least one tariff name.");
    }
}
