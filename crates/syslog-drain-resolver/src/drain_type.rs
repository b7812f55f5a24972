// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Drain type classification.
//!
//! A drain forwards logs unless its URL carries a `drain-type` query
//! parameter, in which case the first value is used as-is.

use std::borrow::Cow;

use url::{form_urlencoded, ParseError, Url};

use crate::error::ResolveError;

/// Type assigned to drains that do not declare one.
pub const DEFAULT_DRAIN_TYPE: &str = "logs";

/// Adapter type reported for every drain backed by a user-provided service.
pub const SERVICE_ADAPTER_TYPE: &str = "service";

const DRAIN_TYPE_PARAM: &str = "drain-type";

/// Returns the drain type declared by `drain_url`.
///
/// Scheme-less references such as `logs.example.com/ingest?drain-type=metrics`
/// are accepted and their query is read directly. A reference whose first
/// path segment contains a colon (`://host`) has no usable scheme and is
/// rejected, as are URLs that are malformed in any other way.
pub fn classify(drain_url: &str) -> Result<String, ResolveError> {
    let invalid = |source: ParseError| ResolveError::InvalidDrainUrl {
        url: drain_url.to_string(),
        source,
    };

    match Url::parse(drain_url) {
        Ok(url) => Ok(drain_type_from_pairs(url.query_pairs())),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let query = relative_query(drain_url)
                .ok_or_else(|| invalid(ParseError::RelativeUrlWithoutBase))?;
            Ok(drain_type_from_pairs(form_urlencoded::parse(query.as_bytes())))
        }
        Err(source) => Err(invalid(source)),
    }
}

fn drain_type_from_pairs<'a>(
    mut pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
) -> String {
    pairs
        .find(|(key, _)| *key == DRAIN_TYPE_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| DEFAULT_DRAIN_TYPE.to_string())
}

/// Query of a relative reference, or `None` when the reference cannot be a
/// valid URI (colon in the first path segment, control characters).
fn relative_query(reference: &str) -> Option<&str> {
    if reference.chars().any(|c| c.is_ascii_control()) {
        return None;
    }

    let without_fragment = reference.split('#').next().unwrap_or_default();
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    };

    let first_segment = path.split('/').next().unwrap_or_default();
    if first_segment.contains(':') {
        return None;
    }

    Some(query)
}
