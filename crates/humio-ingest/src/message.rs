// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Event messages and their ingest wire shapes.
//!
//! Both variants render to a batch holding exactly one entry:
//!
//! ```text
//! structured:   [{"tags": {"host", "source", "environment"?}, "events": [{"timestamp", "attributes"}]}]
//! unstructured: [{"fields": {"source", "env", "level", "message"}, "messages": [message]}]
//! ```

use chrono::{Local, SecondsFormat};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::constants::{STRUCTURED_INGEST_PATH, UNSTRUCTURED_INGEST_PATH};
use crate::error::ConstructionError;
use crate::serializer::to_canonical_string;

/// Who is emitting events. `host` falls back to `source` once, here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    source: String,
    host: String,
    environment: Option<String>,
}

impl Identity {
    pub fn new(
        source: impl Into<String>,
        host: Option<String>,
        environment: Option<String>,
    ) -> Self {
        let source = source.into();
        let host = host.unwrap_or_else(|| source.clone());
        Identity {
            source,
            host,
            environment,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }
}

/// Current local time as timezone-aware ISO 8601 with microseconds,
/// e.g. `2020-11-16T00:00:00.000000+01:00`.
#[must_use]
pub fn now_iso8601() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// An attribute map with a timestamp, sent to the structured endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredEvent {
    identity: Arc<Identity>,
    timestamp: String,
    attributes: Map<String, Value>,
}

impl StructuredEvent {
    /// The timestamp defaults to now, captured here rather than at serialization.
    pub fn new(
        identity: impl Into<Arc<Identity>>,
        attributes: Map<String, Value>,
        timestamp: Option<String>,
    ) -> Self {
        StructuredEvent {
            identity: identity.into(),
            timestamp: timestamp.unwrap_or_else(now_iso8601),
            attributes,
        }
    }

    /// Builds an event from any value that serializes to a JSON object.
    pub fn from_serializable<T>(
        identity: impl Into<Arc<Identity>>,
        attributes: &T,
        timestamp: Option<String>,
    ) -> Result<Self, ConstructionError>
    where
        T: ?Sized + Serialize,
    {
        match serde_json::to_value(attributes)? {
            Value::Object(map) => Ok(Self::new(identity, map, timestamp)),
            other => Err(ConstructionError::AttributesNotAnObject(json_kind(&other))),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn build(&self) -> Value {
        let mut tags = Map::new();
        tags.insert("host".to_string(), Value::from(self.identity.host()));
        tags.insert("source".to_string(), Value::from(self.identity.source()));
        if let Some(environment) = self.identity.environment() {
            tags.insert("environment".to_string(), Value::from(environment));
        }

        json!([{
            "tags": tags,
            "events": [{
                "timestamp": self.timestamp,
                "attributes": self.attributes,
            }],
        }])
    }
}

/// A formatted log line with its severity, sent to the unstructured endpoint.
/// Humio assigns the ingestion time, so no timestamp is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstructuredEvent {
    identity: Arc<Identity>,
    environment: String,
    level: String,
    message: String,
}

impl UnstructuredEvent {
    /// Fails with [`ConstructionError::MissingField`] when the identity has no environment.
    pub fn new(
        identity: impl Into<Arc<Identity>>,
        level: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        let identity = identity.into();
        let environment = identity
            .environment()
            .ok_or(ConstructionError::MissingField("environment"))?
            .to_string();
        Ok(UnstructuredEvent {
            identity,
            environment,
            level: level.into(),
            message: message.into(),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn build(&self) -> Value {
        json!([{
            "fields": {
                "source": self.identity.source(),
                "env": self.environment,
                "level": self.level,
                "message": self.message,
            },
            "messages": [self.message],
        }])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Structured(StructuredEvent),
    Unstructured(UnstructuredEvent),
}

impl Message {
    /// In-memory wire representation.
    pub fn build(&self) -> Value {
        match self {
            Message::Structured(event) => event.build(),
            Message::Unstructured(event) => event.build(),
        }
    }

    /// Canonical payload text, byte-identical across calls.
    pub fn to_payload(&self) -> Result<String, ConstructionError> {
        Ok(to_canonical_string(&self.build())?)
    }

    /// Ingest path for this variant, relative to the cluster base URL.
    pub fn ingest_path(&self) -> &'static str {
        match self {
            Message::Structured(_) => STRUCTURED_INGEST_PATH,
            Message::Unstructured(_) => UNSTRUCTURED_INGEST_PATH,
        }
    }
}

impl From<StructuredEvent> for Message {
    fn from(event: StructuredEvent) -> Self {
        Message::Structured(event)
    }
}

impl From<UnstructuredEvent> for Message {
    fn from(event: UnstructuredEvent) -> Self {
        Message::Unstructured(event)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = self.to_payload().map_err(|_| fmt::Error)?;
        f.write_str(&payload)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::collections::HashMap;

    fn attributes() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("status".to_string(), json!(true));
        map.insert("eventType".to_string(), json!("testEvent"));
        map
    }

    fn identity() -> Identity {
        Identity::new(
            "test_source",
            Some("humio_tests".to_string()),
            Some("dev".to_string()),
        )
    }

    #[test]
    fn test_host_defaults_to_source() {
        let identity = Identity::new("svc", None, None);
        assert_eq!(identity.host(), "svc");
        assert_eq!(identity.environment(), None);

        let identity = Identity::new("svc", Some("box-1".to_string()), None);
        assert_eq!(identity.host(), "box-1");
        assert_eq!(identity.source(), "svc");
    }

    #[test]
    fn test_structured_build_with_timestamp() {
        let ts = "2020-09-01T00:00:00+00:00".to_string();
        let event = StructuredEvent::new(identity(), attributes(), Some(ts.clone()));

        assert_eq!(
            event.build(),
            json!([{
                "tags": {"host": "humio_tests", "source": "test_source", "environment": "dev"},
                "events": [{"timestamp": ts, "attributes": {"status": true, "eventType": "testEvent"}}]
            }])
        );
    }

    #[test]
    fn test_structured_literal_text() {
        let mut attributes = Map::new();
        attributes.insert("a".to_string(), json!(1));
        let event = StructuredEvent::new(
            Identity::new("s", Some("h".to_string()), None),
            attributes,
            Some("2020-11-16T00:00:00+01:00".to_string()),
        );

        assert_eq!(
            Message::from(event).to_payload().unwrap(),
            r#"[{"tags": {"host": "h", "source": "s"}, "events": [{"timestamp": "2020-11-16T00:00:00+01:00", "attributes": {"a": 1}}]}]"#
        );
    }

    #[test]
    fn test_structured_default_timestamp_is_timezone_aware() {
        let event = StructuredEvent::new(identity(), attributes(), None);

        assert!(!event.timestamp().is_empty());
        let parsed = DateTime::parse_from_rfc3339(event.timestamp());
        assert!(parsed.is_ok(), "not RFC 3339: {}", event.timestamp());
        // the built payload carries the captured timestamp unchanged
        assert_eq!(
            event.build()[0]["events"][0]["timestamp"],
            json!(event.timestamp())
        );
    }

    #[test]
    fn test_default_timestamps_do_not_decrease() {
        let first = StructuredEvent::new(identity(), attributes(), None);
        let second = StructuredEvent::new(identity(), attributes(), None);

        let first = DateTime::parse_from_rfc3339(first.timestamp()).unwrap();
        let second = DateTime::parse_from_rfc3339(second.timestamp()).unwrap();
        assert!(first <= second);
    }

    #[test]
    fn test_timestamp_is_fixed_at_construction() {
        let event = StructuredEvent::new(identity(), attributes(), None);
        let before = event.timestamp().to_string();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_eq!(event.build()[0]["events"][0]["timestamp"], json!(before));
    }

    #[test]
    fn test_from_serializable() {
        let mut attrs = HashMap::new();
        attrs.insert("status", "ok");
        let event = StructuredEvent::from_serializable(identity(), &attrs, None).unwrap();
        assert_eq!(event.attributes().get("status"), Some(&json!("ok")));
    }

    #[test]
    fn test_from_serializable_rejects_non_objects() {
        let err = StructuredEvent::from_serializable(identity(), &vec![1, 2], None).unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::AttributesNotAnObject("an array")
        ));
    }

    #[test]
    fn test_from_serializable_rejects_unserializable() {
        let mut attrs = HashMap::new();
        attrs.insert((1, 2), "tuple keys are not JSON keys");
        let err = StructuredEvent::from_serializable(identity(), &attrs, None).unwrap_err();
        assert!(matches!(err, ConstructionError::Serialization(_)));
    }

    #[test]
    fn test_unstructured_build() {
        let identity = Identity::new("test", None, Some("dev".to_string()));
        let event = UnstructuredEvent::new(identity, "INFO", "hello").unwrap();

        assert_eq!(
            event.build(),
            json!([{
                "fields": {"source": "test", "env": "dev", "level": "INFO", "message": "hello"},
                "messages": ["hello"]
            }])
        );
    }

    #[test]
    fn test_unstructured_requires_environment() {
        let identity = Identity::new("test", None, None);
        let err = UnstructuredEvent::new(identity, "INFO", "hello").unwrap_err();
        assert!(matches!(err, ConstructionError::MissingField("environment")));
    }

    #[test]
    fn test_to_string_is_deterministic() {
        let message = Message::from(StructuredEvent::new(identity(), attributes(), None));
        let first = message.to_string();
        let second = message.to_string();
        assert_eq!(first, second);
        assert_eq!(first, message.to_payload().unwrap());
    }

    #[test]
    fn test_ingest_paths() {
        let structured = Message::from(StructuredEvent::new(identity(), Map::new(), None));
        let unstructured = Message::from(UnstructuredEvent::new(identity(), "INFO", "x").unwrap());
        assert_eq!(structured.ingest_path(), "/api/v1/ingest/humio-structured");
        assert_eq!(unstructured.ingest_path(), "/api/v1/ingest/humio-unstructured");
    }
}
