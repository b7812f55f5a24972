// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Wire shapes of the Cloud Controller collections walked by the resolver.
//!
//! The v2 collections (service instances, service bindings) carry their
//! cursor in a top-level `next_url`; the v3 application listing nests it
//! under `pagination.next`. Each page type implements [`Page`] so the
//! pagination walker never needs to know which shape it is reading.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// One decoded page of a paginated collection.
pub trait Page: DeserializeOwned {
    type Resource;

    /// Splits the page into its resources and the cursor of the next page,
    /// `None` once the collection is exhausted.
    fn into_parts(self) -> (Vec<Self::Resource>, Option<String>);
}

/// A pagination cursor. Older API versions hand out a bare URL, newer ones an
/// object carrying `href`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Cursor {
    Url(String),
    Link { href: Option<String> },
}

impl Cursor {
    fn into_next(cursor: Option<Cursor>) -> Option<String> {
        let next = match cursor? {
            Cursor::Url(url) => url,
            Cursor::Link { href } => href?,
        };
        if next.is_empty() {
            None
        } else {
            Some(next)
        }
    }
}

/// Decodes `null` the same way as an absent field: as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInstancesPage {
    #[serde(default)]
    pub next_url: Option<Cursor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<ServiceInstance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInstance {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ServiceInstanceMetadata,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity: ServiceInstanceEntity,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInstanceMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub guid: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInstanceEntity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_bindings_url: String,
    #[serde(default)]
    pub syslog_drain_url: Option<String>,
}

impl ServiceInstance {
    /// The configured drain URL, or `None` when the instance is not a drain.
    pub fn drain_url(&self) -> Option<&str> {
        self.entity
            .syslog_drain_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

impl Page for ServiceInstancesPage {
    type Resource = ServiceInstance;

    fn into_parts(self) -> (Vec<ServiceInstance>, Option<String>) {
        (self.resources, Cursor::into_next(self.next_url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceBindingsPage {
    #[serde(default)]
    pub next_url: Option<Cursor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<ServiceBinding>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceBinding {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity: ServiceBindingEntity,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceBindingEntity {
    #[serde(default, deserialize_with = "null_as_default")]
    pub app_guid: String,
    #[serde(default)]
    pub app_url: Option<String>,
}

impl Page for ServiceBindingsPage {
    type Resource = ServiceBinding;

    fn into_parts(self) -> (Vec<ServiceBinding>, Option<String>) {
        (self.resources, Cursor::into_next(self.next_url))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Vec<App>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next: Option<Cursor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct App {
    #[serde(default, deserialize_with = "null_as_default")]
    pub guid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl Page for AppsPage {
    type Resource = App;

    fn into_parts(self) -> (Vec<App>, Option<String>) {
        let next = self.pagination.and_then(|p| Cursor::into_next(p.next));
        (self.resources, next)
    }
}
