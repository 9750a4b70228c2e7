// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Structured event delivery.
//!
//! Every send, blocking or async, goes through the same steps in [`Ingest`]:
//! build the message, serialize it, POST it once, and classify the status.
//! Only HTTP 200 counts as delivered. Nothing is retried.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::HumioConfig;
use crate::constants::{CONTENT_TYPE_JSON, STRUCTURED_INGEST_PATH};
use crate::error::{ConstructionError, DeliveryFailure, DeliveryResult, TransportError};
use crate::message::{Identity, Message, StructuredEvent};
use crate::transport::{IngestRequest, ReqwestTransport, Transport};

/// Endpoint, credentials and transport for one sender. Read-only after
/// construction, so clones can be used from any number of tasks.
#[derive(Debug, Clone)]
pub(crate) struct Ingest {
    pub(crate) identity: Arc<Identity>,
    url: String,
    headers: HeaderMap,
    transport: Arc<dyn Transport>,
}

impl Ingest {
    pub(crate) fn new(
        config: &HumioConfig,
        path: &'static str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConstructionError> {
        config.validate()?;
        Ok(Ingest {
            identity: Arc::new(Identity::new(
                config.source.clone(),
                config.host.clone(),
                config.environment.clone(),
            )),
            url: config.ingest_url(path),
            headers: build_headers(&config.token)?,
            transport,
        })
    }

    fn prepare(&self, message: &Message) -> Result<IngestRequest, ConstructionError> {
        Ok(IngestRequest {
            url: self.url.clone(),
            body: message.to_payload()?,
            headers: self.headers.clone(),
        })
    }

    pub(crate) fn deliver_blocking(&self, message: &Message) -> DeliveryResult {
        let request = self.prepare(message)?;
        debug!("Sending {} bytes to {}", request.body.len(), request.url);
        classify(&request.url, self.transport.post_blocking(&request))
    }

    pub(crate) async fn deliver(&self, message: &Message) -> DeliveryResult {
        let request = self.prepare(message)?;
        debug!("Sending {} bytes to {}", request.body.len(), request.url);
        classify(&request.url, self.transport.post(&request).await)
    }
}

fn build_headers(token: &str) -> Result<HeaderMap, ConstructionError> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    headers.insert(AUTHORIZATION, authorization);
    Ok(headers)
}

fn classify(url: &str, outcome: Result<StatusCode, TransportError>) -> DeliveryResult {
    match outcome {
        Ok(StatusCode::OK) => {
            debug!("Successfully delivered event to {url}");
            Ok(())
        }
        Ok(status) => {
            error!("{status}: Failed to push event to {url}");
            Err(DeliveryFailure::Status(status).into())
        }
        Err(e) => {
            error!("Error shipping event to {url}: {e}");
            Err(DeliveryFailure::Transport(e).into())
        }
    }
}

/// Sends attribute maps to the structured ingest endpoint.
#[derive(Debug, Clone)]
pub struct EventSender {
    ingest: Ingest,
}

impl EventSender {
    /// Creates a sender that posts through [`ReqwestTransport`].
    pub fn new(config: &HumioConfig) -> Result<Self, ConstructionError> {
        let transport = ReqwestTransport::new(config.timeout, config.https_proxy.clone());
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(
        config: &HumioConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConstructionError> {
        Ok(EventSender {
            ingest: Ingest::new(config, STRUCTURED_INGEST_PATH, transport)?,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.ingest.identity
    }

    pub fn url(&self) -> &str {
        &self.ingest.url
    }

    /// Headers sent with every request. The authorization value is marked sensitive.
    pub fn headers(&self) -> &HeaderMap {
        &self.ingest.headers
    }

    /// The message a send call would deliver, with `timestamp` defaulting to now.
    pub fn build_event(&self, attributes: Map<String, Value>, timestamp: Option<String>) -> Message {
        StructuredEvent::new(Arc::clone(&self.ingest.identity), attributes, timestamp).into()
    }

    /// Posts one event and blocks until the endpoint answers.
    pub fn send_event(
        &self,
        attributes: Map<String, Value>,
        timestamp: Option<String>,
    ) -> DeliveryResult {
        let message = self.build_event(attributes, timestamp);
        self.ingest.deliver_blocking(&message)
    }

    /// Same contract as [`EventSender::send_event`] without blocking the caller.
    /// Concurrent calls are independent and may complete in any order.
    pub async fn send_event_async(
        &self,
        attributes: Map<String, Value>,
        timestamp: Option<String>,
    ) -> DeliveryResult {
        let message = self.build_event(attributes, timestamp);
        self.ingest.deliver(&message).await
    }

    /// Like [`EventSender::send_event`] for any value serializing to a JSON object.
    pub fn send_serializable<T>(&self, attributes: &T, timestamp: Option<String>) -> DeliveryResult
    where
        T: ?Sized + Serialize,
    {
        let message = self.build_serializable(attributes, timestamp)?;
        self.ingest.deliver_blocking(&message)
    }

    pub async fn send_serializable_async<T>(
        &self,
        attributes: &T,
        timestamp: Option<String>,
    ) -> DeliveryResult
    where
        T: ?Sized + Serialize + Sync,
    {
        let message = self.build_serializable(attributes, timestamp)?;
        self.ingest.deliver(&message).await
    }

    fn build_serializable<T>(
        &self,
        attributes: &T,
        timestamp: Option<String>,
    ) -> Result<Message, ConstructionError>
    where
        T: ?Sized + Serialize,
    {
        StructuredEvent::from_serializable(Arc::clone(&self.ingest.identity), attributes, timestamp)
            .map(Message::from)
    }
}
