//! SNOMED Mapper Common Library
//!
//! Shared by the server, the native client and the Web(WASM) front end:
//! wire types, input parsing, the page view state and the
//! form-submission controller.

pub mod api;
pub mod controller;
pub mod error;
pub mod parser;
pub mod types;
pub mod view;

pub use api::{download_url, Sleeper, TariffApi, UploadFile, PROGRESS_RESET_DELAY};
pub use controller::{submit_tariffs, upload_tariff_file};
pub use error::{Action, ActionError, ApiError, InputError, Result};
pub use parser::{file_label, parse_error_body, parse_tariff_names};
pub use types::{
    format_score, is_highlighted, ErrorDetail, ResultRow, ServiceStatus, TariffMatch,
    TariffRequest, TariffResponse, UploadResult,
};
pub use view::{FileResults, ProgressState, RequestToken, Tab, TabController, ViewState};
