// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::fetcher::FetchError;

/// Errors that abort a drain resolution.
///
/// Every variant is fail-fast: the first one raised stops the walk and is
/// handed back to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to decode page from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid drain url '{url}': {source}")]
    InvalidDrainUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised while loading resolver configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
