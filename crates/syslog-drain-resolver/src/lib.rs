// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Lists the syslog drains bound within a Cloud Foundry space.
//!
//! A drain is a user-provided service instance carrying a syslog drain URL.
//! [`DrainResolver`] walks the space's service instances, the bindings of
//! each drain and the names of every bound application, and returns one
//! [`Drain`] record per drain. All API access goes through [`HttpFetcher`].

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod config;
pub mod drain_type;
pub mod error;
pub mod fetcher;
pub mod pagination;
pub mod resolver;
pub mod schema;
#[cfg(test)]
mod test_support;

pub use config::ResolverConfig;
pub use drain_type::{classify, DEFAULT_DRAIN_TYPE, SERVICE_ADAPTER_TYPE};
pub use error::{ConfigError, ResolveError};
pub use fetcher::{ClientOptions, CloudControllerClient, FetchError, HttpFetcher};
pub use resolver::{Drain, DrainResolver, ResolverOptions};
