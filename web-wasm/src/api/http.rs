//! Matching service over the browser fetch API
//!
//! Requests go to the page origin, as the service also serves the page.

use gloo::timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use snomed_mapper_common::api::{MATCH_ENDPOINT, PROCESS_EXCEL_ENDPOINT, UPLOAD_FIELD};
use snomed_mapper_common::{
    parse_error_body, ApiError, Sleeper, TariffApi, TariffRequest, TariffResponse, UploadFile,
    UploadResult,
};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData, Request, RequestInit, RequestMode, Response};

/// Relative URLs, resolved against the page
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchApi;

impl FetchApi {
    async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_network_error)?;
        let resp: Response = resp_value.dyn_into().map_err(js_network_error)?;

        let text_promise = resp.text().map_err(js_network_error)?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(js_network_error)?
            .as_string()
            .unwrap_or_default();

        if !resp.ok() {
            return Err(parse_error_body(resp.status(), &body));
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl TariffApi for FetchApi {
    async fn match_tariffs(&self, request: &TariffRequest) -> Result<TariffResponse, ApiError> {
        let body = serde_json::to_string(request).map_err(|e| ApiError::Decode(e.to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(MATCH_ENDPOINT, &opts)
            .map_err(js_network_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_network_error)?;

        self.send(request).await
    }

    async fn process_excel(&self, file: &UploadFile) -> Result<UploadResult, ApiError> {
        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let blob = Blob::new_with_u8_array_sequence(&parts).map_err(js_network_error)?;

        let form = FormData::new().map_err(js_network_error)?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, &blob, &file.name)
            .map_err(js_network_error)?;

        // the browser sets the multipart boundary itself
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(PROCESS_EXCEL_ENDPOINT, &opts)
            .map_err(js_network_error)?;

        self.send(request).await
    }
}

/// `setTimeout`-backed sleeper
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutSleeper;

impl Sleeper for TimeoutSleeper {
    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(duration.as_millis() as u32).await;
    }
}

fn js_network_error(value: JsValue) -> ApiError {
    ApiError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
