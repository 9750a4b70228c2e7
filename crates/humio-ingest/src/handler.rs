// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use crate::config::HumioConfig;
use crate::constants::UNSTRUCTURED_INGEST_PATH;
use crate::error::{ConstructionError, DeliveryResult};
use crate::message::{Identity, Message, UnstructuredEvent};
use crate::sender::Ingest;
use crate::transport::{ReqwestTransport, Transport};

/// Ships already-formatted log lines to the unstructured ingest endpoint.
///
/// This is the sink half of a logging integration: the host formats the
/// record, the handler delivers it, and any failure is handed back so the
/// host's own error policy decides what happens next. See
/// [`crate::layer::HumioLayer`] for the `tracing` integration.
#[derive(Debug, Clone)]
pub struct LogHandler {
    ingest: Ingest,
}

impl LogHandler {
    /// Requires `environment`, which every unstructured event carries.
    pub fn new(config: &HumioConfig) -> Result<Self, ConstructionError> {
        let transport = ReqwestTransport::new(config.timeout, config.https_proxy.clone());
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(
        config: &HumioConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConstructionError> {
        if config.environment.is_none() {
            return Err(ConstructionError::MissingField("environment"));
        }
        Ok(LogHandler {
            ingest: Ingest::new(config, UNSTRUCTURED_INGEST_PATH, transport)?,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.ingest.identity
    }

    pub fn build_message(&self, level: &str, line: &str) -> Result<Message, ConstructionError> {
        UnstructuredEvent::new(Arc::clone(&self.ingest.identity), level, line).map(Message::from)
    }

    /// Delivers one formatted line, blocking until the endpoint answers.
    pub fn emit(&self, level: &str, line: &str) -> DeliveryResult {
        let message = self.build_message(level, line)?;
        self.ingest.deliver_blocking(&message)
    }

    pub async fn emit_async(&self, level: &str, line: &str) -> DeliveryResult {
        let message = self.build_message(level, line)?;
        self.ingest.deliver(&message).await
    }
}
