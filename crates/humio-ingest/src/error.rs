// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::header::InvalidHeaderValue;
use reqwest::StatusCode;

/// Error produced by a [`crate::transport::Transport`] when no response was obtained.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a single send call.
pub type DeliveryResult = Result<(), HumioError>;

/// Raised before any network call is made.
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Event attributes must serialize to a JSON object, got {0}")]
    AttributesNotAnObject(&'static str),

    #[error("Payload is not serializable: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Token is not a valid header value: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
}

/// The ingest endpoint did not accept the payload.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryFailure {
    #[error("Humio responded with status {0}")]
    Status(StatusCode),

    #[error("Transport failed before a response was received: {0}")]
    Transport(TransportError),
}

impl DeliveryFailure {
    /// Status code observed from the endpoint, if it answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DeliveryFailure::Status(status) => Some(*status),
            DeliveryFailure::Transport(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HumioError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Delivery(#[from] DeliveryFailure),
}

impl HumioError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HumioError::Construction(_) => None,
            HumioError::Delivery(failure) => failure.status(),
        }
    }

    #[must_use]
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, HumioError::Delivery(_))
    }
}
