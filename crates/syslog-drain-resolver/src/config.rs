// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Environment-driven configuration for the resolver and its HTTP client.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::fetcher::ClientOptions;
use crate::resolver::ResolverOptions;

/// Cloud Controller API root.
const ENV_API_URL: &str = "CF_API_URL";
/// Pre-obtained `Authorization` header value.
const ENV_ACCESS_TOKEN: &str = "CF_ACCESS_TOKEN";
/// Space to resolve when running the bundled binary.
const ENV_SPACE_GUID: &str = "CF_SPACE_GUID";
const ENV_SKIP_SSL_VALIDATION: &str = "CF_SKIP_SSL_VALIDATION";
const ENV_ALLOW_PLAINTEXT: &str = "CF_ALLOW_PLAINTEXT";
const ENV_TIMEOUT_SECS: &str = "DRAIN_RESOLVER_TIMEOUT_SECS";
const ENV_APP_BATCH_SIZE: &str = "DRAIN_RESOLVER_APP_BATCH_SIZE";
const ENV_BINDING_CONCURRENCY: &str = "DRAIN_RESOLVER_BINDING_CONCURRENCY";
const ENV_LOG_LEVEL: &str = "DRAIN_RESOLVER_LOG_LEVEL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_APP_BATCH_SIZE: usize = 50;
pub const DEFAULT_BINDING_CONCURRENCY: usize = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings for talking to the Cloud Controller and resolving drains.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Cloud Controller base URL (scheme + host, optional path prefix).
    pub api_url: String,
    /// Authorization header value, e.g. `bearer eyJ...`.
    pub access_token: Option<String>,
    /// Space whose drains should be listed.
    pub space_guid: Option<String>,
    pub skip_ssl_validation: bool,
    pub allow_plaintext: bool,
    pub timeout: Duration,
    /// Maximum number of app guids sent in one lookup request.
    pub app_batch_size: usize,
    /// Number of service-binding walks allowed in flight at once.
    pub binding_concurrency: usize,
    pub log_level: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            access_token: None,
            space_guid: None,
            skip_ssl_validation: false,
            allow_plaintext: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            app_batch_size: DEFAULT_APP_BATCH_SIZE,
            binding_concurrency: DEFAULT_BINDING_CONCURRENCY,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Builds and validates settings from the current process environment.
    pub fn from_os_env() -> Result<Self, ConfigError> {
        Self::from_env_iter(env::vars())
    }

    /// Builds and validates settings from key/value pairs (typically for tests).
    pub fn from_env_iter<I, K, V>(iter: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let api_url = map
            .get(ENV_API_URL)
            .and_then(|value| sanitize_non_empty(value))
            .unwrap_or_default();
        let access_token = map
            .get(ENV_ACCESS_TOKEN)
            .and_then(|value| sanitize_non_empty(value));
        let space_guid = map
            .get(ENV_SPACE_GUID)
            .and_then(|value| sanitize_non_empty(value));
        let skip_ssl_validation =
            parse_bool(map.get(ENV_SKIP_SSL_VALIDATION).map(String::as_str), false);
        let allow_plaintext = parse_bool(map.get(ENV_ALLOW_PLAINTEXT).map(String::as_str), false);
        let timeout = Duration::from_secs(parse_number(
            map.get(ENV_TIMEOUT_SECS).map(String::as_str),
            DEFAULT_TIMEOUT_SECS,
        ));
        let app_batch_size = parse_number(
            map.get(ENV_APP_BATCH_SIZE).map(String::as_str),
            DEFAULT_APP_BATCH_SIZE,
        );
        let binding_concurrency = parse_number(
            map.get(ENV_BINDING_CONCURRENCY).map(String::as_str),
            DEFAULT_BINDING_CONCURRENCY,
        );
        let log_level = map
            .get(ENV_LOG_LEVEL)
            .map(|value| value.trim().to_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let config = Self {
            api_url,
            access_token,
            space_guid,
            skip_ssl_validation,
            allow_plaintext,
            timeout,
            app_batch_size,
            binding_concurrency,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{ENV_API_URL} is required")));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request timeout must be greater than 0".to_string(),
            ));
        }

        if self.app_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "app lookup batch size must be greater than 0".to_string(),
            ));
        }

        if self.binding_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "binding concurrency must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            authorization: self.access_token.clone(),
            timeout: self.timeout,
            allow_plaintext: self.allow_plaintext,
            skip_ssl_validation: self.skip_ssl_validation,
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            app_lookup_batch_size: self.app_batch_size,
            binding_fetch_concurrency: self.binding_concurrency,
        }
    }
}

fn sanitize_non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(ref v) if ["1", "true", "t", "yes", "y"].contains(&v.as_str()) => true,
        Some(ref v) if ["0", "false", "f", "no", "n"].contains(&v.as_str()) => false,
        _ => default,
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<&str>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
