// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Drain resolution for a single space.
//!
//! Resolution runs in four steps:
//! 1. walk the space's user-provided service instances, keeping only the ones
//!    that declare a syslog drain URL;
//! 2. walk each drain's service bindings to collect its bound app guids;
//! 3. look up the names of every distinct app guid in batches;
//! 4. join names back onto each drain, preserving binding order.
//!
//! Every step except the name join is fail-fast. An app whose name could not
//! be resolved is reported with an empty name instead.

use std::collections::{BTreeSet, HashMap};

use futures::stream::{self, StreamExt, TryStreamExt};
use futures::TryFutureExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_APP_BATCH_SIZE, DEFAULT_BINDING_CONCURRENCY};
use crate::drain_type::{classify, SERVICE_ADAPTER_TYPE};
use crate::error::ResolveError;
use crate::fetcher::HttpFetcher;
use crate::pagination::walk;
use crate::schema::{AppsPage, ServiceBindingsPage, ServiceInstance, ServiceInstancesPage};

const SERVICE_INSTANCES_ENDPOINT: &str = "/v2/user_provided_service_instances";
const APPS_ENDPOINT: &str = "/v3/apps";

/// A syslog drain and the applications bound to it.
///
/// `apps[i]` is the name of the application whose guid is `app_guids[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drain {
    pub name: String,
    pub guid: String,
    pub apps: Vec<String>,
    #[serde(rename = "appGuids")]
    pub app_guids: Vec<String>,
    #[serde(rename = "type")]
    pub drain_type: String,
    #[serde(rename = "drainURL")]
    pub drain_url: String,
    #[serde(rename = "adapterType")]
    pub adapter_type: String,
}

/// Tuning knobs for [`DrainResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Maximum number of app guids sent in one lookup request.
    pub app_lookup_batch_size: usize,
    /// Number of service-binding walks allowed in flight at once. `1` keeps
    /// resolution fully sequential.
    pub binding_fetch_concurrency: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            app_lookup_batch_size: DEFAULT_APP_BATCH_SIZE,
            binding_fetch_concurrency: DEFAULT_BINDING_CONCURRENCY,
        }
    }
}

/// A drain whose bound apps are known by guid only.
#[derive(Debug)]
struct DiscoveredDrain {
    name: String,
    guid: String,
    drain_type: String,
    drain_url: String,
    app_guids: Vec<String>,
}

/// Resolves the syslog drains of a space through an [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct DrainResolver<F> {
    fetcher: F,
    options: ResolverOptions,
}

impl<F: HttpFetcher> DrainResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_options(fetcher, ResolverOptions::default())
    }

    pub fn with_options(fetcher: F, options: ResolverOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Lists every drain bound in `space_guid`, with app names resolved.
    ///
    /// An empty space yields an empty list.
    pub async fn resolve(&self, space_guid: &str) -> Result<Vec<Drain>, ResolveError> {
        let discovered = self.discover_drains(space_guid).await?;

        let app_guids: BTreeSet<String> = discovered
            .iter()
            .flat_map(|drain| drain.app_guids.iter().cloned())
            .collect();
        let app_names = self.resolve_app_names(&app_guids).await?;

        let drains = materialize(discovered, &app_names);
        info!(
            space_guid = %space_guid,
            drains = drains.len(),
            apps = app_guids.len(),
            "resolved syslog drains"
        );
        Ok(drains)
    }

    async fn discover_drains(&self, space_guid: &str) -> Result<Vec<DiscoveredDrain>, ResolveError> {
        let path = format!("{SERVICE_INSTANCES_ENDPOINT}?q=space_guid:{space_guid}");
        let instances = walk::<ServiceInstancesPage, _>(&self.fetcher, &path).await?;
        let total = instances.len();

        let drain_instances: Vec<ServiceInstance> = instances
            .into_iter()
            .filter(|instance| instance.drain_url().is_some())
            .collect();
        debug!(
            space_guid = %space_guid,
            instances = total,
            drains = drain_instances.len(),
            "discovered user-provided service instances"
        );

        // Walks complete in any order; the first failure ends resolution even
        // while earlier walks are still in flight.
        let concurrency = self.options.binding_fetch_concurrency.max(1);
        let mut discovered: Vec<(usize, DiscoveredDrain)> =
            stream::iter(drain_instances.into_iter().enumerate())
                .map(|(index, instance)| {
                    self.discover_drain(instance)
                        .map_ok(move |drain| (index, drain))
                })
                .buffer_unordered(concurrency)
                .try_collect()
                .await?;
        discovered.sort_unstable_by_key(|(index, _)| *index);

        Ok(discovered.into_iter().map(|(_, drain)| drain).collect())
    }

    async fn discover_drain(&self, instance: ServiceInstance) -> Result<DiscoveredDrain, ResolveError> {
        let drain_url = instance.drain_url().unwrap_or_default().to_string();
        let drain_type = classify(&drain_url)?;

        let bindings =
            walk::<ServiceBindingsPage, _>(&self.fetcher, &instance.entity.service_bindings_url)
                .await?;
        let app_guids: Vec<String> = bindings
            .into_iter()
            .map(|binding| binding.entity.app_guid)
            .collect();
        debug!(
            drain = %instance.entity.name,
            drain_type = %drain_type,
            apps = app_guids.len(),
            "collected drain bindings"
        );

        Ok(DiscoveredDrain {
            name: instance.entity.name,
            guid: instance.metadata.guid,
            drain_type,
            drain_url,
            app_guids,
        })
    }

    /// Maps app guid to app name. No request is made when `app_guids` is empty.
    async fn resolve_app_names(
        &self,
        app_guids: &BTreeSet<String>,
    ) -> Result<HashMap<String, String>, ResolveError> {
        let mut names = HashMap::with_capacity(app_guids.len());
        if app_guids.is_empty() {
            return Ok(names);
        }

        let guids: Vec<&str> = app_guids.iter().map(String::as_str).collect();
        let batch_size = self.options.app_lookup_batch_size.max(1);
        for batch in guids.chunks(batch_size) {
            let path = format!("{APPS_ENDPOINT}?guids={}", batch.join(","));
            let apps = walk::<AppsPage, _>(&self.fetcher, &path).await?;
            names.extend(apps.into_iter().map(|app| (app.guid, app.name)));
        }

        Ok(names)
    }
}

fn materialize(discovered: Vec<DiscoveredDrain>, app_names: &HashMap<String, String>) -> Vec<Drain> {
    discovered
        .into_iter()
        .map(|drain| {
            let apps: Vec<String> = drain
                .app_guids
                .iter()
                .map(|guid| match app_names.get(guid) {
                    Some(name) => name.clone(),
                    None => {
                        warn!(drain = %drain.name, app_guid = %guid, "unable to resolve app name");
                        String::new()
                    }
                })
                .collect();

            Drain {
                name: drain.name,
                guid: drain.guid,
                apps,
                app_guids: drain.app_guids,
                drain_type: drain.drain_type,
                drain_url: drain.drain_url,
                adapter_type: SERVICE_ADAPTER_TYPE.to_string(),
            }
        })
        .collect()
}
