// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for resolver unit tests.

#![cfg(test)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future;
use reqwest::Method;
use serde_json::{json, Value};

use crate::fetcher::{FetchError, HttpFetcher};

enum Scripted {
    Body(String),
    Fail(Option<FetchError>),
    Hang,
}

/// Replays canned bodies (or one-shot errors) keyed by request path and
/// records every path it was asked for. A path scripted with [`hang`] never
/// completes.
///
/// [`hang`]: ScriptedFetcher::hang
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, path: &str, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Scripted::Body(body.into()));
        self
    }

    pub(crate) fn fail(self, path: &str, error: FetchError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Scripted::Fail(Some(error)));
        self
    }

    pub(crate) fn hang(self, path: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), Scripted::Hang);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|path| path.starts_with(prefix))
            .collect()
    }
}

#[async_trait]
impl HttpFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        path: &str,
        method: Method,
        _body: Option<&str>,
    ) -> Result<Bytes, FetchError> {
        assert_eq!(method, Method::GET);
        self.calls.lock().unwrap().push(path.to_string());

        let outcome = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(path) {
                Some(Scripted::Body(body)) => Some(Ok(Bytes::from(body.clone()))),
                Some(Scripted::Fail(error)) => Some(Err(error.take().unwrap_or_else(|| {
                    FetchError::Unavailable(format!("{path} already failed"))
                }))),
                Some(Scripted::Hang) => None,
                None => Some(Err(FetchError::Unavailable(format!(
                    "no response scripted for {path}"
                )))),
            }
        };

        match outcome {
            Some(result) => result,
            None => future::pending().await,
        }
    }
}

pub(crate) fn bindings_path(instance_guid: &str) -> String {
    format!("/v2/user_provided_service_instances/{instance_guid}/service_bindings")
}

pub(crate) fn instances_path(space_guid: &str) -> String {
    format!("/v2/user_provided_service_instances?q=space_guid:{space_guid}")
}

pub(crate) fn instance_json(guid: &str, name: &str, drain_url: &str) -> Value {
    json!({
        "metadata": {"guid": guid},
        "entity": {
            "name": name,
            "service_bindings_url": bindings_path(guid),
            "syslog_drain_url": drain_url,
        }
    })
}

pub(crate) fn instances_page(next_url: Option<&str>, resources: &[Value]) -> String {
    json!({"next_url": next_url, "resources": resources}).to_string()
}

pub(crate) fn bindings_page(next_url: Option<&str>, app_guids: &[&str]) -> String {
    let resources: Vec<Value> = app_guids
        .iter()
        .map(|guid| json!({"entity": {"app_guid": guid, "app_url": format!("/v2/apps/{guid}")}}))
        .collect();
    json!({"next_url": next_url, "resources": resources}).to_string()
}

pub(crate) fn apps_page(next: Option<&str>, apps: &[(&str, &str)]) -> String {
    let resources: Vec<Value> = apps
        .iter()
        .map(|(guid, name)| json!({"guid": guid, "name": name}))
        .collect();
    json!({"resources": resources, "pagination": {"next": next}}).to_string()
}
