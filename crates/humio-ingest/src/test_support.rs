// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory transport for unit tests.

#![cfg(test)]

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use std::sync::Mutex;

use crate::error::TransportError;
use crate::transport::{IngestRequest, Transport};

/// The only token [`RecordingTransport::new`] accepts.
pub(crate) const CORRECT_TOKEN: &str = "correct_token";

#[derive(Debug)]
enum Reply {
    /// 200 when the bearer token matches, 403 otherwise
    CheckToken,
    Fixed(StatusCode),
    Unreachable,
}

/// Records every request and answers without touching the network.
#[derive(Debug)]
pub(crate) struct RecordingTransport {
    reply: Reply,
    requests: Mutex<Vec<IngestRequest>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::with_reply(Reply::CheckToken)
    }

    pub(crate) fn with_status(status: StatusCode) -> Self {
        Self::with_reply(Reply::Fixed(status))
    }

    pub(crate) fn unreachable() -> Self {
        Self::with_reply(Reply::Unreachable)
    }

    fn with_reply(reply: Reply) -> Self {
        RecordingTransport {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().expect("lock poisoned").len()
    }

    pub(crate) fn requests(&self) -> Vec<IngestRequest> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    fn respond(&self, request: &IngestRequest) -> Result<StatusCode, TransportError> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(request.clone());

        match self.reply {
            Reply::CheckToken => {
                let authorized = request
                    .headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .is_some_and(|value| value.contains(CORRECT_TOKEN));
                if authorized {
                    Ok(StatusCode::OK)
                } else {
                    Ok(StatusCode::FORBIDDEN)
                }
            }
            Reply::Fixed(status) => Ok(status),
            Reply::Unreachable => Err("connection refused".into()),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn post_blocking(&self, request: &IngestRequest) -> Result<StatusCode, TransportError> {
        self.respond(request)
    }

    async fn post(&self, request: &IngestRequest) -> Result<StatusCode, TransportError> {
        self.respond(request)
    }
}
