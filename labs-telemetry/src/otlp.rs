//! OTLP exporter construction.
//!
//! One [`OtlpExporterOptions`] value configures the span, metric, and log
//! exporters identically; anything left unset falls through to the OTLP
//! crate's environment variables and defaults.

use std::collections::HashMap;

use opentelemetry_otlp::{
    LogExporter, MetricExporter, SpanExporter, WithExportConfig, WithTonicConfig,
};
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue, MetadataMap};

use crate::config::OtlpExporterOptions;
use crate::error::Error;

pub(crate) fn span_exporter(options: &OtlpExporterOptions) -> Result<SpanExporter, Error> {
    let mut builder = SpanExporter::builder().with_tonic();
    if let Some(metadata) = grpc_metadata(&options.headers)? {
        builder = builder.with_metadata(metadata);
    }
    if let Some(protocol) = options.protocol {
        builder = builder.with_protocol(protocol);
    }
    if let Some(endpoint) = &options.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    if let Some(timeout) = options.timeout() {
        builder = builder.with_timeout(timeout);
    }
    Ok(builder.build()?)
}

pub(crate) fn metric_exporter(options: &OtlpExporterOptions) -> Result<MetricExporter, Error> {
    let mut builder = MetricExporter::builder().with_tonic();
    if let Some(metadata) = grpc_metadata(&options.headers)? {
        builder = builder.with_metadata(metadata);
    }
    if let Some(protocol) = options.protocol {
        builder = builder.with_protocol(protocol);
    }
    if let Some(endpoint) = &options.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    if let Some(timeout) = options.timeout() {
        builder = builder.with_timeout(timeout);
    }
    Ok(builder.build()?)
}

pub(crate) fn log_exporter(options: &OtlpExporterOptions) -> Result<LogExporter, Error> {
    let mut builder = LogExporter::builder().with_tonic();
    if let Some(metadata) = grpc_metadata(&options.headers)? {
        builder = builder.with_metadata(metadata);
    }
    if let Some(protocol) = options.protocol {
        builder = builder.with_protocol(protocol);
    }
    if let Some(endpoint) = &options.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    if let Some(timeout) = options.timeout() {
        builder = builder.with_timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Converts configured headers into gRPC metadata. Returns `None` for an
/// empty map so the exporter keeps its default metadata untouched.
fn grpc_metadata(headers: &HashMap<String, String>) -> Result<Option<MetadataMap>, Error> {
    if headers.is_empty() {
        return Ok(None);
    }
    let mut metadata = MetadataMap::with_capacity(headers.len());
    for (name, value) in headers {
        let key = name
            .parse::<AsciiMetadataKey>()
            .map_err(|_| Error::InvalidHeaderName(name.clone()))?;
        let value = value
            .parse::<AsciiMetadataValue>()
            .map_err(|_| Error::InvalidHeaderValue(name.clone()))?;
        metadata.insert(key, value);
    }
    Ok(Some(metadata))
}
