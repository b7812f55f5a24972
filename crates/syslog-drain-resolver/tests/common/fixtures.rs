// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Cloud Controller response bodies used by the integration tests.

use serde_json::{json, Value};
use syslog_drain_resolver::{ClientOptions, CloudControllerClient};

pub const SPACE_GUID: &str = "space-1";
pub const ACCESS_TOKEN: &str = "bearer test-token";

/// Builds a client pointed at a mock server, allowing plaintext.
pub fn client_for(server_url: &str) -> CloudControllerClient {
    CloudControllerClient::new(
        server_url,
        ClientOptions {
            authorization: Some(ACCESS_TOKEN.to_string()),
            allow_plaintext: true,
            ..Default::default()
        },
    )
    .expect("failed to create client")
}

pub fn bindings_path(instance_guid: &str) -> String {
    format!("/v2/user_provided_service_instances/{instance_guid}/service_bindings")
}

pub fn instance(guid: &str, name: &str, drain_url: Option<&str>) -> Value {
    json!({
        "metadata": {"guid": guid, "url": format!("/v2/user_provided_service_instances/{guid}")},
        "entity": {
            "name": name,
            "credentials": {},
            "space_guid": SPACE_GUID,
            "type": "user_provided_service_instance",
            "service_bindings_url": bindings_path(guid),
            "syslog_drain_url": drain_url,
        }
    })
}

pub fn instances_page(next_url: Option<&str>, resources: Vec<Value>) -> String {
    json!({
        "total_results": resources.len(),
        "prev_url": null,
        "next_url": next_url,
        "resources": resources,
    })
    .to_string()
}

pub fn bindings_page(next_url: Option<&str>, app_guids: &[&str]) -> String {
    let resources: Vec<Value> = app_guids
        .iter()
        .map(|guid| {
            json!({
                "metadata": {"guid": format!("binding-{guid}")},
                "entity": {"app_guid": guid, "app_url": format!("/v2/apps/{guid}")}
            })
        })
        .collect();
    json!({"next_url": next_url, "resources": resources}).to_string()
}

pub fn apps_page(next_href: Option<&str>, apps: &[(&str, &str)]) -> String {
    let resources: Vec<Value> = apps
        .iter()
        .map(|(guid, name)| json!({"guid": guid, "name": name, "state": "STARTED"}))
        .collect();
    let next = next_href.map(|href| json!({"href": href}));
    json!({
        "pagination": {"total_results": apps.len(), "next": next},
        "resources": resources,
    })
    .to_string()
}
