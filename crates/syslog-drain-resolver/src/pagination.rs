// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::Method;
use tracing::debug;

use crate::error::ResolveError;
use crate::fetcher::HttpFetcher;
use crate::schema::Page;

/// Follows a collection's cursor from `start` until the API reports no next
/// page, returning every resource in page order. An empty `start` names no
/// collection and yields no resources without a request.
///
/// The first fetch or decode failure aborts the walk; no partial results are
/// returned.
pub async fn walk<P, F>(fetcher: &F, start: &str) -> Result<Vec<P::Resource>, ResolveError>
where
    P: Page,
    F: HttpFetcher + ?Sized,
{
    let mut resources = Vec::new();
    let mut next = (!start.is_empty()).then(|| start.to_string());
    let mut page_number = 0usize;

    while let Some(path) = next.take() {
        page_number += 1;
        let body = fetcher
            .fetch(&path, Method::GET, None)
            .await
            .map_err(|source| ResolveError::Fetch {
                path: path.clone(),
                source,
            })?;
        let page: P = serde_json::from_slice(&body).map_err(|source| ResolveError::Decode {
            path: path.clone(),
            source,
        })?;

        let (page_resources, cursor) = page.into_parts();
        debug!(
            path = %path,
            page = page_number,
            resources = page_resources.len(),
            "fetched page"
        );
        resources.extend(page_resources);
        next = cursor;
    }

    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::schema::{ServiceBindingsPage, ServiceInstancesPage};
    use crate::test_support::{instance_json, instances_page, ScriptedFetcher};

    #[tokio::test]
    async fn test_walk_concatenates_three_pages() {
        let fetcher = ScriptedFetcher::new()
            .respond(
                "/start",
                instances_page(Some("/page2"), &[instance_json("a", "one", "")]),
            )
            .respond(
                "/page2",
                instances_page(
                    Some("/page3"),
                    &[instance_json("b", "two", ""), instance_json("c", "three", "")],
                ),
            )
            .respond(
                "/page3",
                instances_page(None, &[instance_json("d", "four", "")]),
            );

        let resources = walk::<ServiceInstancesPage, _>(&fetcher, "/start")
            .await
            .unwrap();

        let guids: Vec<&str> = resources
            .iter()
            .map(|r| r.metadata.guid.as_str())
            .collect();
        assert_eq!(guids, vec!["a", "b", "c", "d"]);
        assert_eq!(fetcher.calls(), vec!["/start", "/page2", "/page3"]);
    }

    #[tokio::test]
    async fn test_walk_stops_at_first_fetch_error() {
        let fetcher = ScriptedFetcher::new()
            .respond(
                "/start",
                instances_page(Some("/page2"), &[instance_json("a", "one", "")]),
            )
            .fail(
                "/page2",
                FetchError::Status {
                    status: 500,
                    body: "boom".to_string(),
                },
            )
            .respond("/page3", instances_page(None, &[]));

        let error = walk::<ServiceInstancesPage, _>(&fetcher, "/start")
            .await
            .unwrap_err();

        match error {
            ResolveError::Fetch { path, source } => {
                assert_eq!(path, "/page2");
                assert!(matches!(source, FetchError::Status { status: 500, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fetcher.calls(), vec!["/start", "/page2"]);
    }

    #[tokio::test]
    async fn test_walk_reports_decode_error_with_path() {
        let fetcher = ScriptedFetcher::new().respond("/bindings", "{\"resources\": 42}");

        let error = walk::<ServiceBindingsPage, _>(&fetcher, "/bindings")
            .await
            .unwrap_err();

        assert!(matches!(error, ResolveError::Decode { ref path, .. } if path == "/bindings"));
    }

    #[tokio::test]
    async fn test_walk_single_empty_page() {
        let fetcher = ScriptedFetcher::new().respond("/start", instances_page(None, &[]));

        let resources = walk::<ServiceInstancesPage, _>(&fetcher, "/start")
            .await
            .unwrap();

        assert!(resources.is_empty());
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_walk_empty_start_makes_no_request() {
        let fetcher = ScriptedFetcher::new();

        let resources = walk::<ServiceBindingsPage, _>(&fetcher, "").await.unwrap();

        assert!(resources.is_empty());
        assert_eq!(fetcher.call_count(), 0);
    }
}
