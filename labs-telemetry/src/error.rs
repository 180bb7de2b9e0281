//! Failure kinds surfaced during pipeline construction.

use thiserror::Error;

/// Errors raised while loading configuration or building the telemetry
/// pipelines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Reading a configuration file failed.
    #[error("failed to read telemetry configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document could not be parsed.
    #[error("invalid telemetry configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// A configured header name is not a valid gRPC metadata key.
    #[error("invalid exporter header name `{0}`")]
    InvalidHeaderName(String),

    /// A configured header value is not valid for gRPC metadata.
    #[error("invalid value for exporter header `{0}`")]
    InvalidHeaderValue(String),

    /// Building an OTLP exporter failed.
    #[error(transparent)]
    ExporterBuild(#[from] opentelemetry_otlp::ExporterBuildError),

    /// A global tracing subscriber was already installed.
    #[error("global tracing subscriber already set: {0}")]
    SubscriberInstall(#[from] tracing_subscriber::util::TryInitError),
}
