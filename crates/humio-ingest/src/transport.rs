// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use core::time::Duration;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::fmt::Debug;
use tracing::debug;

use crate::error::TransportError;
use crate::http::{build_blocking_client, build_client};

/// A fully prepared POST to an ingest endpoint.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub url: String,
    pub body: String,
    pub headers: HeaderMap,
}

/// Performs the network POST for a sender. Implementations report the
/// response status, or an error when no response was obtained; classifying
/// the status is the caller's job.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Blocks the calling thread for the full round trip.
    fn post_blocking(&self, request: &IngestRequest) -> Result<StatusCode, TransportError>;

    async fn post(&self, request: &IngestRequest) -> Result<StatusCode, TransportError>;
}

/// Default transport backed by reqwest.
///
/// Every call builds its own client, so the connection it opens lives only
/// as long as that call and is dropped on every exit path.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    timeout: Option<Duration>,
    https_proxy: Option<String>,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new(timeout: Option<Duration>, https_proxy: Option<String>) -> Self {
        ReqwestTransport {
            timeout,
            https_proxy,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn post_blocking(&self, request: &IngestRequest) -> Result<StatusCode, TransportError> {
        // reqwest::blocking drops its own runtime, which panics on a tokio thread.
        if tokio::runtime::Handle::try_current().is_ok() {
            return std::thread::scope(|scope| {
                scope
                    .spawn(|| self.send_blocking(request))
                    .join()
                    .unwrap_or_else(|_| Err("blocking ingest thread panicked".into()))
            });
        }
        self.send_blocking(request)
    }

    async fn post(&self, request: &IngestRequest) -> Result<StatusCode, TransportError> {
        let client = build_client(self.timeout, self.https_proxy.as_deref())?;
        let response = client
            .post(&request.url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await?;
        debug!("POST {} returned {}", request.url, response.status());
        Ok(response.status())
    }
}

impl ReqwestTransport {
    fn send_blocking(&self, request: &IngestRequest) -> Result<StatusCode, TransportError> {
        let client = build_blocking_client(self.timeout, self.https_proxy.as_deref())?;
        let response = client
            .post(&request.url)
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()?;
        debug!("POST {} returned {}", request.url, response.status());
        Ok(response.status())
    }
}
