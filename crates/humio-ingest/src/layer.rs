// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! `tracing` integration for [`LogHandler`].
//!
//! [`HumioLayer`] is a `tracing_subscriber::Layer` that formats each event
//! as a single line and ships it through the handler's blocking path:
//!
//! ```text
//! [2020-11-16 09:30:00.123] INFO in billing::checkout: order placed order_id=42
//! ```
//!
//! Delivery failures go to the layer's error hook. The default hook writes
//! a report to stderr; replace it with [`HumioLayer::with_error_handler`] to
//! panic, count, or fall back to another sink instead.
//!
//! Events from this crate and from the HTTP stack are never forwarded.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tracing_subscriber::prelude::*;
//!
//! let handler = LogHandler::new(&HumioConfig::from_env()?)?;
//! tracing_subscriber::registry()
//!     .with(HumioLayer::new(handler))
//!     .init();
//! ```
//!
//! Events are shipped on the emitting thread. Inside a tokio runtime the
//! default transport moves the request onto a scoped thread, so the
//! emitting task still blocks until the response arrives.

use chrono::Local;
use std::cell::Cell;
use std::fmt::{self, Write};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::constants::IGNORED_TARGET_PREFIXES;
use crate::error::HumioError;
use crate::handler::LogHandler;

pub type ErrorHook = Arc<dyn Fn(&HumioError) + Send + Sync>;

thread_local! {
    static EMITTING: Cell<bool> = const { Cell::new(false) };
}

/// Clears the re-entrancy flag however the emit call ends.
struct EmitGuard;

impl EmitGuard {
    fn acquire() -> Option<Self> {
        if EMITTING.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(EmitGuard)
        }
    }
}

impl Drop for EmitGuard {
    fn drop(&mut self) {
        EMITTING.with(|flag| flag.set(false));
    }
}

pub struct HumioLayer {
    handler: LogHandler,
    on_error: ErrorHook,
}

impl HumioLayer {
    #[must_use]
    pub fn new(handler: LogHandler) -> Self {
        HumioLayer {
            handler,
            on_error: Arc::new(report_to_stderr),
        }
    }

    #[must_use]
    pub fn with_error_handler<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&HumioError) + Send + Sync + 'static,
    {
        self.on_error = Arc::new(on_error);
        self
    }
}

impl fmt::Debug for HumioLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumioLayer")
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for HumioLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_ignored(metadata.target()) {
            return;
        }
        let Some(_guard) = EmitGuard::acquire() else {
            return;
        };

        let line = format_line(event);
        if let Err(err) = self.handler.emit(metadata.level().as_str(), &line) {
            (self.on_error)(&err);
        }
    }
}

fn is_ignored(target: &str) -> bool {
    IGNORED_TARGET_PREFIXES.iter().any(|prefix| {
        target
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

fn report_to_stderr(err: &HumioError) {
    eprintln!("--- Logging error ---\nFailed to ship log record to Humio: {err}");
}

/// Renders `[time] LEVEL in target: message key=value ...`.
pub fn format_line(event: &Event<'_>) -> String {
    let mut visitor = LineVisitor::default();
    event.record(&mut visitor);

    let metadata = event.metadata();
    let mut line = format!(
        "[{}] {} in {}: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        metadata.level(),
        metadata.target(),
        visitor.message
    );
    line.push_str(&visitor.fields);
    line
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}
