//! Service endpoints and the transport seam
//!
//! The controller only talks to the service through [`TariffApi`]; the
//! native client implements it with reqwest and the web front end with
//! the browser's fetch.

use crate::error::ApiError;
use crate::types::{TariffRequest, TariffResponse, UploadResult};
use std::time::Duration;

pub const STATUS_ENDPOINT: &str = "/api/v1/status";
pub const MATCH_ENDPOINT: &str = "/api/v1/match";
pub const PROCESS_EXCEL_ENDPOINT: &str = "/api/v1/process-excel";
pub const DOWNLOAD_ENDPOINT: &str = "/api/v1/download";

/// Multipart field carrying the uploaded spreadsheet
pub const UPLOAD_FIELD: &str = "file";

/// How long the progress indicator stays up after an upload finishes
pub const PROGRESS_RESET_DELAY: Duration = Duration::from_millis(1000);

/// Download path for a generated file
pub fn download_url(file_id: &str) -> String {
    format!("{}/{}", DOWNLOAD_ENDPOINT, file_id)
}

/// A spreadsheet picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Request/response calls against the matching service
#[allow(async_fn_in_trait)]
pub trait TariffApi {
    /// POST `/api/v1/match`
    async fn match_tariffs(&self, request: &TariffRequest) -> Result<TariffResponse, ApiError>;

    /// POST `/api/v1/process-excel` (multipart field `file`)
    async fn process_excel(&self, file: &UploadFile) -> Result<UploadResult, ApiError>;
}

/// Timer used for the delayed progress reset
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}
