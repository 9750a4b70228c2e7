// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Humio Cloud, used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://cloud.humio.com";

pub const STRUCTURED_INGEST_PATH: &str = "/api/v1/ingest/humio-structured";
pub const UNSTRUCTURED_INGEST_PATH: &str = "/api/v1/ingest/humio-unstructured";

pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const ENV_SOURCE: &str = "HUMIO_SOURCE";
pub const ENV_TOKEN: &str = "HUMIO_TOKEN";
pub const ENV_ENVIRONMENT: &str = "HUMIO_ENVIRONMENT";
pub const ENV_HOST: &str = "HUMIO_HOST";
pub const ENV_BASE_URL: &str = "HUMIO_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HUMIO_TIMEOUT_SECS";
pub const ENV_PROXY_HTTPS: &str = "HUMIO_PROXY_HTTPS";

/// Event targets the tracing sink never forwards: the crate itself and the
/// HTTP stack underneath it.
pub const IGNORED_TARGET_PREFIXES: &[&str] = &[
    "humio_ingest",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];
