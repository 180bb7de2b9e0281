//! Exporter configuration shared by the trace, metric, and log sinks.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use opentelemetry_otlp::Protocol;
use serde::{Deserialize, Deserializer};

use crate::error::Error;

/// Options applied identically to the three OTLP signal exporters.
///
/// Fields left unset defer to the OTLP crate's `OTEL_EXPORTER_OTLP_*`
/// environment variables and built-in defaults (gRPC to
/// `http://localhost:4317`, 10 second timeout).
///
/// ```
/// use labs_telemetry::OtlpExporterOptions;
///
/// let options = OtlpExporterOptions::from_yaml(
///     r#"
///     endpoint: http://collector:4317
///     timeout_millis: 5000
///     headers:
///       x-api-key: secret
///     "#,
/// )
/// .unwrap();
/// assert_eq!(options.endpoint.as_deref(), Some("http://collector:4317"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtlpExporterOptions {
    /// Collector endpoint for all three signals.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Headers attached to every export request.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Per-request export timeout in milliseconds.
    #[serde(default)]
    pub timeout_millis: Option<u64>,

    /// Wire protocol, one of `grpc`, `http/protobuf`, or `http/json`.
    #[serde(default, deserialize_with = "deserialize_protocol")]
    pub protocol: Option<Protocol>,
}

impl OtlpExporterOptions {
    /// Parses options from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses options from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout_millis.map(Duration::from_millis)
    }
}

fn deserialize_protocol<'de, D>(deserializer: D) -> Result<Option<Protocol>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim().to_lowercase().as_str() {
        "grpc" => Ok(Some(Protocol::Grpc)),
        "http/protobuf" => Ok(Some(Protocol::HttpBinary)),
        "http/json" => Ok(Some(Protocol::HttpJson)),
        _ => Err(serde::de::Error::custom(format!("Invalid protocol: {}", s))),
    }
}
