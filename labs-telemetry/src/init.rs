//! Process-wide pipeline assembly.
//!
//! [`init_telemetry`] wires up:
//! - a tracer, meter, and logger provider sharing one [`Resource`]
//! - OTLP batch exporters plus stdout exporters for each signal
//! - the log-to-trace correlator on the log pipeline
//! - W3C trace context propagation
//! - a `tracing` subscriber that routes events into the log pipeline
//!
//! [`Resource`]: opentelemetry_sdk::Resource

use opentelemetry::global;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::OtlpExporterOptions;
use crate::error::Error;
use crate::processor::SpanEventLogProcessor;
use crate::{otlp, resource};

/// Default directives when `RUST_LOG` is unset. The exporters' own
/// dependencies log through `tracing` too; their events are kept out of the
/// bridge so an export cannot feed the pipeline it exports for.
const DEFAULT_LOG_DIRECTIVES: &str = "info,hyper=off,tonic=off,h2=off,opentelemetry=off";

/// Builds the tracer, meter, and logger providers, installs them as the
/// process defaults, and registers a global `tracing` subscriber that feeds
/// the log pipeline.
///
/// Every exporter ships over gRPC and is configured from the same `options`
/// value, so construction must happen inside a Tokio runtime. Call this once
/// at startup; a second call fails with [`Error::SubscriberInstall`] and
/// leaves the globals untouched.
///
/// The returned [`TelemetryProviders`] must stay alive for the lifetime of
/// the process and be [`shutdown`](TelemetryProviders::shutdown) before exit
/// to flush batched telemetry.
pub fn init_telemetry(options: &OtlpExporterOptions) -> Result<TelemetryProviders, Error> {
    let resource = resource::telemetry_resource();

    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(resource.clone())
        .with_batch_exporter(otlp::span_exporter(options)?)
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build();

    let meter_provider = SdkMeterProvider::builder()
        .with_resource(resource.clone())
        .with_periodic_exporter(otlp::metric_exporter(options)?)
        .with_periodic_exporter(opentelemetry_stdout::MetricExporter::default())
        .build();

    // The correlator registers ahead of the exporting processors so it sees
    // every record before export.
    let logger_provider = SdkLoggerProvider::builder()
        .with_resource(resource)
        .with_log_processor(SpanEventLogProcessor::new())
        .with_batch_exporter(otlp::log_exporter(options)?)
        .with_simple_exporter(opentelemetry_stdout::LogExporter::default())
        .build();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    let otel_layer = OpenTelemetryTracingBridge::new(&logger_provider);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .try_init()?;

    global::set_text_map_propagator(TraceContextPropagator::new());
    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    Ok(TelemetryProviders {
        tracer_provider,
        meter_provider,
        logger_provider,
    })
}

/// Owns the providers built by [`init_telemetry`].
#[derive(Debug)]
pub struct TelemetryProviders {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    logger_provider: SdkLoggerProvider,
}

impl TelemetryProviders {
    /// The tracer provider backing [`opentelemetry::global::tracer`].
    pub fn tracer_provider(&self) -> &SdkTracerProvider {
        &self.tracer_provider
    }

    /// The meter provider backing [`opentelemetry::global::meter`].
    pub fn meter_provider(&self) -> &SdkMeterProvider {
        &self.meter_provider
    }

    /// The logger provider the `tracing` bridge emits into.
    pub fn logger_provider(&self) -> &SdkLoggerProvider {
        &self.logger_provider
    }

    /// Flushes and shuts down all three providers, stopping at the first
    /// failure. Logs shut down last so the other pipelines can still record
    /// while they drain.
    pub fn shutdown(self) -> OTelSdkResult {
        self.tracer_provider.shutdown()?;
        self.meter_provider.shutdown()?;
        self.logger_provider.shutdown()?;
        Ok(())
    }
}
