// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::process::ExitCode;

use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use syslog_drain_resolver::{CloudControllerClient, DrainResolver, ResolverConfig};

#[tokio::main]
pub async fn main() -> ExitCode {
    let config = match ResolverConfig::from_os_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", config.log_level);
    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("could not parse log level in configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logging subscriber: {e}");
        return ExitCode::FAILURE;
    }

    let Some(space_guid) = config.space_guid.clone() else {
        error!("CF_SPACE_GUID is required");
        return ExitCode::FAILURE;
    };

    let client = match CloudControllerClient::new(&config.api_url, config.client_options()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Cloud Controller client: {e}");
            return ExitCode::FAILURE;
        }
    };
    debug!(api_url = %client.base_url(), space_guid = %space_guid, "resolving syslog drains");

    let resolver = DrainResolver::with_options(client, config.resolver_options());
    let drains = match resolver.resolve(&space_guid).await {
        Ok(drains) => drains,
        Err(e) => {
            error!("Failed to resolve drains: {e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&drains) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize drains: {e}");
            ExitCode::FAILURE
        }
    }
}
