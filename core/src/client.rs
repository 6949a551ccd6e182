//! Stateless HTTP request builder and response parser for the Civo API.
//!
//! # Design
//! `CivoClient` holds only the base URL, the API key and an optional region,
//! and carries no mutable state between calls. Each operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Resource-specific methods live in the
//! `volume` and `webhook` modules; this file holds what they share.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::SimpleResponse;

const USER_AGENT: &str = concat!("civo-core/", env!("CARGO_PKG_VERSION"));

/// Everything but alphanumerics, `-`, `_` and `~`. Dots are escaped too so an
/// id of `..` cannot climb out of its collection.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Escape `value` so it stays a single path segment or query value.
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT_ENCODE_SET).to_string()
}

/// Synchronous, stateless client for the Civo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. Pair it with a `Transport` through `Connection`
/// to perform real round trips.
#[derive(Debug, Clone)]
pub struct CivoClient {
    base_url: String,
    api_key: String,
    region: Option<String>,
}

impl CivoClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            region: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut client = Self::new(&config.base_url, &config.api_key);
        client.region = config.region.clone();
        client
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn url(&self, path: &str) -> String {
        match &self.region {
            Some(region) => format!("{}{path}?region={}", self.base_url, encode_component(region)),
            None => format!("{}{path}", self.base_url),
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("authorization".to_string(), format!("bearer {}", self.api_key)),
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ]
    }

    /// A request without a payload.
    pub(crate) fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: self.url(path),
            headers: self.headers(),
            body: None,
        }
    }

    /// A request carrying `input` encoded as JSON.
    pub(crate) fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut request = self.request(method, path);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }

    /// Check the status, then decode the body as `T`.
    pub(crate) fn decode<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Decode the acknowledgment returned by mutation endpoints.
    pub fn parse_simple_response(&self, response: HttpResponse) -> Result<SimpleResponse, ApiError> {
        self.decode(response)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status >= 500 {
        tracing::warn!(status = response.status, "civo api returned a server error");
    } else {
        tracing::debug!(status = response.status, "civo api returned an error status");
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
