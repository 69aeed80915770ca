//! Error types for the form controller

use thiserror::Error;

/// Generic message shown when a match request fails
pub const MATCH_FAILED_MESSAGE: &str = "Something went wrong. Please check your API connection.";

/// Fallback message shown when an upload fails without a `detail`
pub const UPLOAD_FAILED_MESSAGE: &str = "An error occurred while processing the file";

/// Rejected before any request is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter at least one tariff name.")]
    EmptyNameList,

    #[error("Please select an Excel file.")]
    NoFileSelected,

    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    #[error("A request is already in progress.")]
    Busy,
}

/// Failure reported by the transport
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// `detail` from the server's error body, if it sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Which user action failed; decides the user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Match,
    Upload,
}

/// Terminal error of a controller action
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{action:?} request failed: {source}")]
    Request {
        action: Action,
        #[source]
        source: ApiError,
    },
}

impl ActionError {
    pub fn request(action: Action, source: ApiError) -> Self {
        ActionError::Request { action, source }
    }

    /// Message for the blocking user notification
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Input(e) => e.to_string(),
            ActionError::Request { action: Action::Match, .. } => MATCH_FAILED_MESSAGE.to_string(),
            ActionError::Request { action: Action::Upload, source } => source
                .detail()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(UPLOAD_FAILED_MESSAGE)
                .to_string(),
        }
    }
}

/// Result alias for controller actions
pub type Result<T> = std::result::Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_messages() {
        assert_eq!(
            InputError::EmptyNameList.to_string(),
            "Please enter at least one tariff name."
        );
        assert_eq!(InputError::NoFileSelected.to_string(), "Please select an Excel file.");
        assert_eq!(InputError::UnknownTab("x".into()).to_string(), "Unknown tab: x");
    }

    #[test]
    fn test_match_failure_is_generic() {
        let err = ActionError::request(
            Action::Match,
            ApiError::Status { status: 400, detail: Some("tariff_names list cannot be empty.".into()) },
        );
        assert_eq!(err.user_message(), MATCH_FAILED_MESSAGE);
    }

    #[test]
    fn test_upload_failure_uses_detail() {
        let err = ActionError::request(
            Action::Upload,
            ApiError::Status { status: 400, detail: Some("X".into()) },
        );
        assert_eq!(err.user_message(), "X");
    }

    #[test]
    fn test_upload_failure_fallback() {
        let no_detail = ActionError::request(Action::Upload, ApiError::Status { status: 500, detail: None });
        assert_eq!(no_detail.user_message(), UPLOAD_FAILED_MESSAGE);

        let network = ActionError::request(Action::Upload, ApiError::Network("refused".into()));
        assert_eq!(network.user_message(), UPLOAD_FAILED_MESSAGE);
    }

    #[test]
    fn test_input_error_converts() {
        let err: ActionError = InputError::Busy.into();
        assert!(matches!(err, ActionError::Input(InputError::Busy)));
        assert_eq!(err.user_message(), "A request is already in progress.");
    }
}
