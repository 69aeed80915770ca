//! View state of the mapper page
//!
//! Everything the page shows lives in [`ViewState`]. Handlers receive it
//! explicitly instead of looking elements up by id, so the whole flow runs
//! (and is tested) without a document tree.

use crate::error::InputError;
use crate::types::ResultRow;

/// Status text shown while an upload is being processed
pub const PROGRESS_PROCESSING: &str = "Processing file...";

/// Status text shown once the upload succeeded
pub const PROGRESS_COMPLETE: &str = "Processing complete!";

/// A tab panel and its button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Text,
    File,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Text, Tab::File];

    /// Element id of the panel
    pub fn panel_id(&self) -> &'static str {
        match self {
            Tab::Text => "textTab",
            Tab::File => "fileTab",
        }
    }

    pub fn from_panel_id(id: &str) -> Option<Tab> {
        Self::ALL.into_iter().find(|t| t.panel_id() == id)
    }
}

/// Which panel is shown and which tab button is marked active
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabController {
    active_panel: Tab,
    active_button: Tab,
}

impl TabController {
    /// Show the panel `tab_id` and mark `trigger` as the active button
    ///
    /// An unknown `tab_id` leaves the state untouched.
    pub fn activate(&mut self, tab_id: &str, trigger: Tab) -> Result<Tab, InputError> {
        let tab = Tab::from_panel_id(tab_id)
            .ok_or_else(|| InputError::UnknownTab(tab_id.to_string()))?;
        self.active_panel = tab;
        self.active_button = trigger;
        Ok(tab)
    }

    pub fn active_panel(&self) -> Tab {
        self.active_panel
    }

    pub fn active_button(&self) -> Tab {
        self.active_button
    }

    pub fn is_panel_visible(&self, tab: Tab) -> bool {
        self.active_panel == tab
    }

    pub fn is_button_active(&self, tab: Tab) -> bool {
        self.active_button == tab
    }
}

/// Identifies one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Text-match section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextMatchView {
    pub rows: Vec<ResultRow>,
    pub results_visible: bool,
    pub(crate) in_flight: Option<RequestToken>,
}

impl TextMatchView {
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Upload progress indicator
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub visible: bool,
    /// 0..=100
    pub percent: u8,
    pub status: String,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            visible: false,
            percent: 0,
            status: PROGRESS_PROCESSING.to_string(),
        }
    }
}

/// Summary of a processed upload
#[derive(Debug, Clone, PartialEq)]
pub struct FileResults {
    pub total_rows: usize,
    pub duplicated_rows: usize,
    /// Target of the download control
    pub download_url: String,
}

/// File-upload section
#[derive(Debug, Clone, PartialEq)]
pub struct UploadView {
    pub file_label: String,
    pub progress: ProgressState,
    /// `None` while the results section is hidden
    pub results: Option<FileResults>,
    pub(crate) in_flight: Option<RequestToken>,
}

impl Default for UploadView {
    fn default() -> Self {
        Self {
            file_label: crate::parser::file_label(None),
            progress: ProgressState::default(),
            results: None,
            in_flight: None,
        }
    }
}

impl UploadView {
    pub fn is_uploading(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Whole page state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub tabs: TabController,
    pub text: TextMatchView,
    pub upload: UploadView,
    /// Pending blocking notification
    pub notice: Option<String>,
    next_token: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending notification, leaving none
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn set_selected_file(&mut self, file_name: Option<&str>) {
        self.upload.file_label = crate::parser::file_label(file_name);
    }

    pub(crate) fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tab_is_text() {
        let tabs = TabController::default();
        assert!(tabs.is_panel_visible(Tab::Text));
        assert!(!tabs.is_panel_visible(Tab::File));
        assert!(tabs.is_button_active(Tab::Text));
    }

    #[test]
    fn test_activate_switches_panel_and_button() {
        let mut tabs = TabController::default();
        let tab = tabs.activate("fileTab", Tab::File).unwrap();
        assert_eq!(tab, Tab::File);
        assert!(tabs.is_panel_visible(Tab::File));
        assert!(!tabs.is_panel_visible(Tab::Text));
        assert!(tabs.is_button_active(Tab::File));
        assert!(!tabs.is_button_active(Tab::Text));
    }

    #[test]
    fn test_activate_unknown_tab_is_rejected() {
        let mut tabs = TabController::default();
        tabs.activate("fileTab", Tab::File).unwrap();
        let before = tabs.clone();

        let err = tabs.activate("settingsTab", Tab::Text).unwrap_err();
        assert_eq!(err, InputError::UnknownTab("settingsTab".to_string()));
        assert_eq!(tabs, before);
    }

    #[test]
    fn test_panel_id_roundtrip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_panel_id(tab.panel_id()), Some(tab));
        }
        assert_eq!(Tab::from_panel_id(""), None);
    }

    #[test]
    fn test_file_label_updates() {
        let mut view = ViewState::new();
        assert_eq!(view.upload.file_label, "No file chosen");
        view.set_selected_file(Some("tariffs.xlsx"));
        assert_eq!(view.upload.file_label, "tariffs.xlsx");
        view.set_selected_file(None);
        assert_eq!(view.upload.file_label, "No file chosen");
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut view = ViewState::new();
        let a = view.issue_token();
        let b = view.issue_token();
        assert_ne!(a, b);
    }
}
