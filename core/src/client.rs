//! Stateless HTTP request builder and response parser for the NocoDB v2
//! table API.
//!
//! # Design
//! `NocoDbClient` holds only the base URL, the API token and the fallback
//! error message; nothing changes between calls. Each verb is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse*` method
//! that consumes an `HttpResponse`. `NocoDb` (see `api.rs`) glues the two
//! halves to a `Transport`; callers that run their own HTTP stack can use
//! this type directly.

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::NocoDbConfig;
use crate::error::{ApiError, DEFAULT_ERROR_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::RequestOptions;

/// Path prefix every table endpoint lives under.
pub const TABLES_PREFIX: &str = "/api/v2/tables/";

pub const TOKEN_HEADER: &str = "xc-token";
const JSON: &str = "application/json";

/// Synchronous, stateless client for the NocoDB table API.
#[derive(Debug, Clone)]
pub struct NocoDbClient {
    base_url: Url,
    token: String,
    fallback_message: String,
}

impl NocoDbClient {
    pub fn new(config: &NocoDbConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            fallback_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }

    /// Replace the message used when a failed response has no usable body.
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/v2/tables/{endpoint}?{params}`.
    ///
    /// `endpoint` already names the table and sub-path, e.g.
    /// `mk3y12zsd2xgngl/records`. Leading slashes are ignored.
    pub fn build_url(&self, endpoint: &str, options: &RequestOptions) -> Result<Url, ApiError> {
        let endpoint = endpoint.trim_start_matches('/');
        if endpoint.trim().is_empty() {
            return Err(ApiError::InvalidEndpoint);
        }

        let mut url = self
            .base_url
            .join(&format!("{TABLES_PREFIX}{endpoint}"))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        if !options.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &options.params {
                pairs.append_pair(key, &value.to_string());
            }
        }
        Ok(url)
    }

    /// Default headers with the caller's headers merged on top.
    pub fn build_headers(&self, options: &RequestOptions) -> Vec<(String, String)> {
        let mut headers = vec![
            (TOKEN_HEADER.to_string(), self.token.clone()),
            ("Content-Type".to_string(), JSON.to_string()),
            ("Accept".to_string(), JSON.to_string()),
        ];
        for (name, value) in &options.headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some(existing) => *existing = (name.clone(), value.clone()),
                None => headers.push((name.clone(), value.clone())),
            }
        }
        headers
    }

    pub fn build_get(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        self.build(HttpMethod::Get, endpoint, options, None)
    }

    pub fn build_post(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        self.build(HttpMethod::Post, endpoint, options, encode_body(options))
    }

    pub fn build_patch(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        self.build(HttpMethod::Patch, endpoint, options, encode_body(options))
    }

    /// DELETE never carries a payload, even if `options.body` is set.
    pub fn build_delete(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        self.build(HttpMethod::Delete, endpoint, options, None)
    }

    /// Decode a success body as `T`, or turn a failure into `ApiError`.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        self.check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Like `parse`, but the body of a success response is ignored.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.check_status(&response)
    }

    fn build(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: &RequestOptions,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.build_url(endpoint, options)?;
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: self.build_headers(options),
            body,
        })
    }

    fn check_status(&self, response: &HttpResponse) -> Result<(), ApiError> {
        if response.is_success() {
            return Ok(());
        }
        Err(ApiError::from_response(response, &self.fallback_message))
    }
}

fn encode_body(options: &RequestOptions) -> Option<String> {
    options.body.as_ref().map(|value| value.to_string())
}
