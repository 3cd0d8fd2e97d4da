// Copyright 2025 the GridVar Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HTTP access for export.

use std::time::Duration;

use reqwest::blocking::{Client, multipart};
use url::Url;

use crate::ExportError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The two requests an export makes.
pub trait ExportTransport {
    /// Fetches the stylesheet embedded in exported documents.
    fn get_text(&self, url: &Url) -> Result<String, ExportError>;

    /// Uploads a composed SVG for rasterization and returns the response body, the location
    /// of the rendered asset.
    fn upload_svg(&self, url: &Url, filename: &str, svg: &str) -> Result<String, ExportError>;
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport with a request timeout.
    pub fn new() -> Result<Self, ExportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ExportError::Transport {
                url: String::new(),
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

fn transport_error(url: &Url, err: &reqwest::Error) -> ExportError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "failed to connect".to_string()
    } else {
        err.to_string()
    };
    ExportError::Transport {
        url: url.to_string(),
        message,
    }
}

fn read_body(url: &Url, response: reqwest::blocking::Response) -> Result<String, ExportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ExportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().map_err(|e| transport_error(url, &e))
}

impl ExportTransport for ReqwestTransport {
    fn get_text(&self, url: &Url) -> Result<String, ExportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| transport_error(url, &e))?;
        read_body(url, response)
    }

    fn upload_svg(&self, url: &Url, filename: &str, svg: &str) -> Result<String, ExportError> {
        let data = multipart::Part::text(svg.to_string())
            .file_name(filename.to_string())
            .mime_str("image/svg+xml")
            .map_err(|e| transport_error(url, &e))?;
        let form = multipart::Form::new()
            .part("data", data)
            .text("filename", filename.to_string());
        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .map_err(|e| transport_error(url, &e))?;
        read_body(url, response)
    }
}
