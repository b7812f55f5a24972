// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP access to the Cloud Controller API.
//!
//! The resolver only ever talks to the API through [`HttpFetcher`], so hosts
//! can plug in their own transport (an existing CLI session, a proxy, a test
//! double). [`CloudControllerClient`] is the reqwest-backed implementation
//! used by the bundled binary.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Url};
use thiserror::Error;
use tracing::debug;

/// Failures reported by an [`HttpFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level issue (DNS, TLS, socket, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    /// The request target could not be built from the base URL and path.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    /// Any other failure raised by a host-provided fetcher.
    #[error("fetch unavailable: {0}")]
    Unavailable(String),
}

/// Issues a request against a path relative to the API root and returns the raw body.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(
        &self,
        path: &str,
        method: Method,
        body: Option<&str>,
    ) -> Result<Bytes, FetchError>;
}

#[async_trait]
impl<T: HttpFetcher + ?Sized> HttpFetcher for std::sync::Arc<T> {
    async fn fetch(
        &self,
        path: &str,
        method: Method,
        body: Option<&str>,
    ) -> Result<Bytes, FetchError> {
        (**self).fetch(path, method, body).await
    }
}

/// Options governing how [`CloudControllerClient`] is constructed.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Value sent verbatim in the `Authorization` header, e.g. `bearer <token>`.
    pub authorization: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Whether plaintext (HTTP) API URLs are allowed.
    pub allow_plaintext: bool,
    /// Whether TLS certificate validation should be skipped.
    pub skip_ssl_validation: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            authorization: None,
            timeout: Duration::from_secs(30),
            allow_plaintext: false,
            skip_ssl_validation: false,
        }
    }
}

/// reqwest-backed [`HttpFetcher`] bound to one Cloud Controller API root.
#[derive(Debug, Clone)]
pub struct CloudControllerClient {
    client: Client,
    base_url: Url,
    headers: HeaderMap,
    authorization: Option<HeaderValue>,
}

impl CloudControllerClient {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, FetchError> {
        let trimmed = base_url.trim_end_matches('/');
        if !options.allow_plaintext && trimmed.starts_with("http://") {
            return Err(FetchError::InvalidUrl(format!(
                "plaintext api url requires explicit opt-in: {trimmed}"
            )));
        }
        let base_url =
            Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl(format!("{trimmed}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("syslog-drain-resolver/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let authorization = options
            .authorization
            .as_deref()
            .map(|authorization| {
                let mut value = HeaderValue::from_str(authorization).map_err(|_| {
                    FetchError::InvalidUrl(
                        "authorization header contains invalid characters".into(),
                    )
                })?;
                value.set_sensitive(true);
                Ok::<_, FetchError>(value)
            })
            .transpose()?;

        let client = create_reqwest_client_builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.skip_ssl_validation)
            .build()?;

        Ok(Self {
            client,
            base_url,
            headers,
            authorization,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request target. Paths are appended to the API root; absolute
    /// cursors handed out by the API are used as-is.
    fn request_url(&self, path: &str) -> Result<Url, FetchError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path).map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")));
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        let separator = if path.starts_with('/') { "" } else { "/" };
        let joined = format!("{base}{separator}{path}");
        Url::parse(&joined).map_err(|e| FetchError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Headers for a request to `url`. Credentials are only attached when the
    /// target shares the API root's origin.
    fn request_headers(&self, url: &Url) -> HeaderMap {
        let mut headers = self.headers.clone();
        if let Some(authorization) = &self.authorization {
            if url.origin() == self.base_url.origin() {
                headers.insert(AUTHORIZATION, authorization.clone());
            } else {
                debug!(url = %url, "withholding credentials from foreign origin");
            }
        }
        headers
    }
}

#[async_trait]
impl HttpFetcher for CloudControllerClient {
    async fn fetch(
        &self,
        path: &str,
        method: Method,
        body: Option<&str>,
    ) -> Result<Bytes, FetchError> {
        let url = self.request_url(path)?;
        debug!(method = %method, url = %url, "cloud controller request");

        let builder = self
            .client
            .request(method.clone(), url.clone())
            .headers(self.request_headers(&url));
        let builder = match body {
            Some(body) => builder.body(body.to_owned()),
            None => builder,
        };
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body_bytes = response.bytes().await.unwrap_or_default();
            let body = String::from_utf8_lossy(&body_bytes).into_owned();
            debug!(method = %method, url = %url, status = %status, body = %body, "cloud controller response");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(method = %method, url = %url, status = %status, "cloud controller response");
        Ok(response.bytes().await?)
    }
}

fn create_reqwest_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder().use_rustls_tls()
}
