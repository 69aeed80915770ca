//! Form-submission controller
//!
//! Two actions drive the page: text matching and spreadsheet upload.
//! Each action is split in phases (`begin_*` / `finish_*`) so a reactive
//! front end can keep the [`ViewState`] in a signal across the await
//! point; [`submit_tariffs`] and [`upload_tariff_file`] chain the phases
//! for callers that own the state directly.
//!
//! Only one request per action may be in flight. A second submission is
//! rejected with [`InputError::Busy`] and sends nothing.

use crate::api::{download_url, Sleeper, TariffApi, UploadFile, PROGRESS_RESET_DELAY};
use crate::error::{Action, ActionError, ApiError, InputError, Result};
use crate::parser::parse_tariff_names;
use crate::types::{ResultRow, TariffRequest, TariffResponse, UploadResult};
use crate::view::{
    FileResults, ProgressState, RequestToken, ViewState, PROGRESS_COMPLETE, PROGRESS_PROCESSING,
};

impl ViewState {
    /// Validate the text area and mark a match request as in flight
    pub fn begin_submit(&mut self, raw_text: &str) -> Result<(RequestToken, TariffRequest)> {
        let outcome = self.try_begin_submit(raw_text);
        self.record(outcome)
    }

    fn try_begin_submit(&mut self, raw_text: &str) -> Result<(RequestToken, TariffRequest)> {
        let tariff_names = parse_tariff_names(raw_text);
        if tariff_names.is_empty() {
            return Err(InputError::EmptyNameList.into());
        }
        if self.text.in_flight.is_some() {
            return Err(InputError::Busy.into());
        }

        let token = self.issue_token();
        self.text.in_flight = Some(token);
        Ok((token, TariffRequest { tariff_names }))
    }

    /// Apply the outcome of a match request
    ///
    /// Outcomes for a token that is no longer in flight are ignored.
    pub fn finish_submit(
        &mut self,
        token: RequestToken,
        outcome: std::result::Result<TariffResponse, ApiError>,
    ) -> Result<()> {
        if self.text.in_flight != Some(token) {
            return Ok(());
        }
        self.text.in_flight = None;

        let response = outcome.map_err(|e| ActionError::request(Action::Match, e));
        let response = self.record(response)?;

        self.text.rows = response.results.iter().map(ResultRow::from).collect();
        self.text.results_visible = true;
        Ok(())
    }

    /// Validate the file selection, show progress and hide old results
    pub fn begin_upload<'f>(
        &mut self,
        file: Option<&'f UploadFile>,
    ) -> Result<(RequestToken, &'f UploadFile)> {
        let outcome = self.try_begin_upload(file);
        self.record(outcome)
    }

    fn try_begin_upload<'f>(
        &mut self,
        file: Option<&'f UploadFile>,
    ) -> Result<(RequestToken, &'f UploadFile)> {
        let file = file.ok_or(InputError::NoFileSelected)?;
        if self.upload.in_flight.is_some() {
            return Err(InputError::Busy.into());
        }

        let token = self.issue_token();
        self.upload.in_flight = Some(token);
        self.upload.progress = ProgressState {
            visible: true,
            percent: 0,
            status: PROGRESS_PROCESSING.to_string(),
        };
        self.upload.results = None;
        Ok((token, file))
    }

    /// Apply the outcome of an upload
    ///
    /// The token stays in flight until [`ViewState::reset_progress`].
    pub fn finish_upload(
        &mut self,
        token: RequestToken,
        outcome: std::result::Result<UploadResult, ApiError>,
    ) -> Result<()> {
        if self.upload.in_flight != Some(token) {
            return Ok(());
        }

        let result = outcome.map_err(|e| ActionError::request(Action::Upload, e));
        let result = self.record(result)?;

        self.upload.progress.percent = 100;
        self.upload.progress.status = PROGRESS_COMPLETE.to_string();
        self.upload.results = Some(FileResults {
            total_rows: result.total_rows,
            duplicated_rows: result.duplicated_rows,
            download_url: download_url(&result.file_id),
        });
        Ok(())
    }

    /// Hide and reset the progress indicator, releasing the upload token
    pub fn reset_progress(&mut self, token: RequestToken) {
        if self.upload.in_flight != Some(token) {
            return;
        }
        self.upload.in_flight = None;
        self.upload.progress.visible = false;
        self.upload.progress.percent = 0;
    }

    fn record<T>(&mut self, outcome: Result<T>) -> Result<T> {
        if let Err(e) = &outcome {
            self.notice = Some(e.user_message());
        }
        outcome
    }
}

/// Submit the text area to the matcher and render the results
pub async fn submit_tariffs<A: TariffApi>(
    view: &mut ViewState,
    api: &A,
    raw_text: &str,
) -> Result<()> {
    let (token, request) = view.begin_submit(raw_text)?;
    let outcome = api.match_tariffs(&request).await;
    view.finish_submit(token, outcome)
}

/// Upload a spreadsheet and expose its summary and download link
///
/// The progress reset runs after [`PROGRESS_RESET_DELAY`] whatever the
/// outcome of the request.
pub async fn upload_tariff_file<A: TariffApi, S: Sleeper>(
    view: &mut ViewState,
    api: &A,
    sleeper: &S,
    file: Option<&UploadFile>,
) -> Result<()> {
    let (token, file) = view.begin_upload(file)?;

    let outcome = api.process_excel(file).await;
    let finished = view.finish_upload(token, outcome);

    sleeper.sleep(PROGRESS_RESET_DELAY).await;
    view.reset_progress(token);

    finished
}
