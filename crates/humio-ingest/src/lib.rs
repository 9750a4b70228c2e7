// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client for Humio's HTTP ingest API.
//!
//! Two senders share one delivery routine:
//!
//! - [`EventSender`] posts attribute maps to the structured endpoint
//!   (`/api/v1/ingest/humio-structured`).
//! - [`LogHandler`] posts formatted log lines to the unstructured endpoint
//!   (`/api/v1/ingest/humio-unstructured`), and plugs into `tracing` through
//!   [`HumioLayer`].
//!
//! Each call sends exactly one event in one POST. HTTP 200 is success;
//! any other status or a transport error is returned as a
//! [`DeliveryFailure`]. There is no batching, buffering or retry.

#![deny(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod handler;
pub mod http;
pub mod layer;
pub mod message;
pub mod sender;
pub mod serializer;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::HumioConfig;
pub use error::{ConstructionError, DeliveryFailure, DeliveryResult, HumioError, TransportError};
pub use handler::LogHandler;
pub use layer::HumioLayer;
pub use message::{Identity, Message, StructuredEvent, UnstructuredEvent};
pub use sender::EventSender;
pub use transport::{IngestRequest, ReqwestTransport, Transport};
