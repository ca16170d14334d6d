//! Request descriptor construction.
//!
//! # Design
//! URLs are assembled as `base + endpoint path + "?" + token + parameters`
//! and then validated with `url::Url`. Validation failure is the only way a
//! build fails; it surfaces as a network-class `ApiError` so callers see the
//! same failure path as for a request that never reached the server.

use url::Url;
use uuid::Uuid;

use crate::endpoint::Endpoint;
use crate::error::{ApiError, NetworkError};
use crate::http::{HttpMethod, HttpRequest};
use crate::params::{encode_query, encode_value, Params};

/// Base URL of the public Web API.
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api/";

/// Binary content for `files.upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl FileUpload {
    pub fn new(data: impl Into<Vec<u8>>, filename: &str) -> Self {
        Self {
            data: data.into(),
            filename: filename.to_string(),
            content_type: "application/octet-stream".to_string(),
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }
}

/// Builds `HttpRequest` descriptors against one API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    base_url: String,
}

impl RequestBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a GET descriptor for `endpoint`.
    pub fn build(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
        params: Option<&Params>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.url(endpoint, token, params)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        })
    }

    /// Build a multipart `files.upload` POST with a fresh random boundary.
    pub fn build_upload(
        &self,
        token: Option<&str>,
        params: Option<&Params>,
        file: &FileUpload,
    ) -> Result<HttpRequest, ApiError> {
        let boundary = format!("Boundary-{}", Uuid::new_v4().simple());
        self.build_upload_with_boundary(token, params, file, &boundary)
    }

    /// Build a multipart `files.upload` POST with a caller-chosen boundary.
    pub fn build_upload_with_boundary(
        &self,
        token: Option<&str>,
        params: Option<&Params>,
        file: &FileUpload,
        boundary: &str,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.url(Endpoint::FilesUpload, token, params)?;
        for (what, value) in [("content type", file.content_type.as_str()), ("boundary", boundary)] {
            if value.contains(['\r', '\n']) {
                return Err(NetworkError::InvalidRequest {
                    endpoint: Endpoint::FilesUpload,
                    reason: format!("line break in the {what}"),
                }
                .into());
            }
        }
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![(
                "content-type".to_string(),
                format!("multipart/form-data; boundary={boundary}"),
            )],
            body: Some(multipart_body(file, boundary)),
        })
    }

    fn url(
        &self,
        endpoint: Endpoint,
        token: Option<&str>,
        params: Option<&Params>,
    ) -> Result<String, ApiError> {
        let mut url = format!("{}/{}?", self.base_url, endpoint.path());
        if let Some(token) = token {
            url.push_str("token=");
            url.push_str(&encode_value(token));
        }
        if let Some(params) = params {
            url.push_str(&encode_query(params));
        }
        Url::parse(&url).map_err(|e| NetworkError::InvalidRequest {
            endpoint,
            reason: e.to_string(),
        })?;
        Ok(url)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Encode one file part followed by the closing boundary.
fn multipart_body(file: &FileUpload, boundary: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(file.data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            escape_filename(&file.filename)
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.content_type).as_bytes());
    body.extend_from_slice(&file.data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Keep a filename inside its quoted header parameter.
fn escape_filename(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
