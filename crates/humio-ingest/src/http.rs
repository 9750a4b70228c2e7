// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! reqwest client construction shared by the async and blocking transports.
//!
//! Clients use rustls, an optional request deadline and an optional HTTPS
//! proxy. Pooling is left to reqwest's defaults.

use core::time::Duration;
use reqwest::Proxy;

/// Async client builder with rustls TLS.
pub fn create_reqwest_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder().use_rustls_tls()
}

/// Blocking client builder with rustls TLS.
pub fn create_blocking_client_builder() -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder().use_rustls_tls()
}

pub fn build_client(
    timeout: Option<Duration>,
    https_proxy: Option<&str>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = create_reqwest_client_builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy) = https_proxy {
        builder = builder.proxy(Proxy::https(proxy)?);
    }
    builder.build()
}

pub fn build_blocking_client(
    timeout: Option<Duration>,
    https_proxy: Option<&str>,
) -> Result<reqwest::blocking::Client, reqwest::Error> {
    // the blocking builder applies a 30s default; no deadline unless configured
    let mut builder = create_blocking_client_builder().timeout(timeout);
    if let Some(proxy) = https_proxy {
        builder = builder.proxy(Proxy::https(proxy)?);
    }
    builder.build()
}
