//! Native client of the matching service
//!
//! Implements [`TariffApi`] over reqwest so the CLI drives the same
//! controller as the web front end.

use crate::error::{MapperError, Result};
use reqwest::multipart::{Form, Part};
use snomed_mapper_common::api::{MATCH_ENDPOINT, PROCESS_EXCEL_ENDPOINT, STATUS_ENDPOINT, UPLOAD_FIELD};
use snomed_mapper_common::{
    parse_error_body, ApiError, ServiceStatus, Sleeper, TariffApi, TariffRequest,
    TariffResponse, UploadFile, UploadResult,
};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpTariffApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTariffApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MapperError::ApiCall(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> std::result::Result<ServiceStatus, ApiError> {
        let response = self
            .client
            .get(self.url(STATUS_ENDPOINT))
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }

    /// Fetch a generated file (`/api/v1/download/{file_id}`) into `dest`
    pub async fn download(&self, download_path: &str, dest: &Path) -> Result<u64> {
        let response = self
            .client
            .get(self.url(download_path))
            .send()
            .await
            .map_err(|e| MapperError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let err = parse_error_body(status, &body);
            return Err(MapperError::ApiCall(
                err.detail().map(str::to_string).unwrap_or_else(|| err.to_string()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MapperError::ApiCall(e.to_string()))?;
        std::fs::write(dest, &bytes)?;
        Ok(bytes.len() as u64)
    }
}

impl TariffApi for HttpTariffApi {
    async fn match_tariffs(
        &self,
        request: &TariffRequest,
    ) -> std::result::Result<TariffResponse, ApiError> {
        let response = self
            .client
            .post(self.url(MATCH_ENDPOINT))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }

    async fn process_excel(&self, file: &UploadFile) -> std::result::Result<UploadResult, ApiError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.url(PROCESS_EXCEL_ENDPOINT))
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }
}

/// tokio timer for the delayed progress reset
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> std::result::Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "request failed");
        return Err(parse_error_body(status.as_u16(), &body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snomed_mapper_common::download_url;

    #[test]
    fn test_url_joins_base_and_path() {
        let api = HttpTariffApi::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.url(MATCH_ENDPOINT), "http://localhost:8000/api/v1/match");
        assert_eq!(
            api.url(&download_url("abc")),
            "http://localhost:8000/api/v1/download/abc"
        );
    }
}
