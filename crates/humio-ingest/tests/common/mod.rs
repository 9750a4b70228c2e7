// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for integration tests

use humio_ingest::HumioConfig;
use serde_json::{json, Map, Value};
use std::time::Duration;

pub const CORRECT_TOKEN: &str = "correct_token";
pub const TIMESTAMP: &str = "2020-11-16T00:00:00+01:00";

/// Config pointed at a mock server, with a short deadline so a broken
/// server fails the test instead of hanging it.
pub fn config_for(base_url: &str, token: &str) -> HumioConfig {
    HumioConfig::new("test_source", token)
        .with_host("humio_tests")
        .with_environment("dev")
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
}

pub fn attributes() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("status".to_string(), json!(true));
    map.insert("eventType".to_string(), json!("testEvent"));
    map
}

pub const STRUCTURED_BODY: &str = r#"[{"tags": {"host": "humio_tests", "source": "test_source", "environment": "dev"}, "events": [{"timestamp": "2020-11-16T00:00:00+01:00", "attributes": {"status": true, "eventType": "testEvent"}}]}]"#;
