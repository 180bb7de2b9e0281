//! Log processor that surfaces log attributes on the active span.
//!
//! Every log record that carries attributes is mirrored onto the span that
//! is active at the moment the record is emitted, as a span event named
//! `"Error"`. The record itself is untouched and continues to the
//! processors registered after this one, so exporters still receive it.

use opentelemetry::logs::AnyValue;
use opentelemetry::trace::TraceContextExt;
use opentelemetry::{Context, InstrumentationScope, KeyValue, Value};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{LogProcessor, SdkLogRecord};

/// Name given to every span event this processor appends. The name is a
/// fixed literal and is not derived from the record's severity.
const EVENT_NAME: &str = "Error";

/// A [`LogProcessor`] that appends a span event to the currently active
/// span for every log record carrying attributes.
///
/// Records without attributes are ignored, as are records emitted outside
/// of any traced operation; both are normal outcomes and produce no
/// diagnostics. When a span is active, the event carries the record's
/// attributes verbatim and is stamped with the wall-clock time at which
/// the record was processed.
///
/// The processor is stateless and runs synchronously on the emitting
/// thread. It takes no locks and performs no I/O; the event append is
/// synchronized inside the SDK span. Register it on the logger provider
/// ahead of the exporting processors:
///
/// ```
/// use labs_telemetry::SpanEventLogProcessor;
/// use opentelemetry_sdk::logs::SdkLoggerProvider;
///
/// let provider = SdkLoggerProvider::builder()
///     .with_log_processor(SpanEventLogProcessor::new())
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct SpanEventLogProcessor;

impl SpanEventLogProcessor {
    /// Creates a new `SpanEventLogProcessor`.
    pub fn new() -> Self {
        SpanEventLogProcessor
    }

    /// Appends the record's attributes to the span active in `cx`, if any.
    fn append_event(&self, record: &SdkLogRecord, cx: &Context) {
        if !cx.has_active_span() {
            return;
        }
        let attributes = record
            .attributes_iter()
            .map(|(key, value)| KeyValue::new(key.clone(), event_value(value)))
            .collect();
        cx.span()
            .add_event_with_timestamp(EVENT_NAME, opentelemetry::time::now(), attributes);
    }
}

impl LogProcessor for SpanEventLogProcessor {
    fn emit(&self, record: &mut SdkLogRecord, _instrumentation: &InstrumentationScope) {
        // A record without attributes carries nothing worth surfacing.
        if record.attributes_iter().next().is_none() {
            return;
        }
        Context::map_current(|cx| self.append_event(record, cx));
    }

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }

    fn shutdown(&self) -> OTelSdkResult {
        Ok(())
    }
}

/// Converts a log attribute value into a span attribute value. Scalar
/// variants map one to one; anything else keeps its debug rendering.
fn event_value(value: &AnyValue) -> Value {
    match value {
        AnyValue::Int(i) => Value::I64(*i),
        AnyValue::Double(d) => Value::F64(*d),
        AnyValue::String(s) => Value::String(s.clone()),
        AnyValue::Boolean(b) => Value::Bool(*b),
        other => Value::String(format!("{other:?}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::logs::{LogRecord, Logger, LoggerProvider};
    use opentelemetry::trace::{mark_span_as_active, Tracer, TracerProvider};
    use opentelemetry_sdk::logs::SdkLoggerProvider;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};

    fn logger_with_processor() -> SdkLoggerProvider {
        SdkLoggerProvider::builder()
            .with_log_processor(SpanEventLogProcessor::new())
            .build()
    }

    fn tracer_with_exporter() -> (SdkTracerProvider, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        (provider, exporter)
    }

    #[test]
    fn record_without_attributes_appends_nothing() {
        let logger_provider = logger_with_processor();
        let logger = logger_provider.logger("test");
        let (tracer_provider, exporter) = tracer_with_exporter();
        let tracer = tracer_provider.tracer("test");

        let span = tracer.start("operation");
        {
            let _guard = mark_span_as_active(span);
            let record = logger.create_log_record();
            logger.emit(record);
        }

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].events.is_empty());
    }

    #[test]
    fn record_without_active_span_is_ignored() {
        let logger_provider = logger_with_processor();
        let logger = logger_provider.logger("test");
        let (tracer_provider, exporter) = tracer_with_exporter();
        let tracer = tracer_provider.tracer("test");

        // Span exists but is never activated, so the emit below runs with
        // no current span.
        let span = tracer.start("operation");
        let mut record = logger.create_log_record();
        record.add_attribute("code", "E500");
        logger.emit(record);
        drop(span);

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].events.is_empty());
    }

    #[test]
    fn record_with_attributes_appends_one_event() {
        let logger_provider = logger_with_processor();
        let logger = logger_provider.logger("test");
        let (tracer_provider, exporter) = tracer_with_exporter();
        let tracer = tracer_provider.tracer("test");

        let span = tracer.start("operation");
        {
            let _guard = mark_span_as_active(span);
            let mut record = logger.create_log_record();
            record.add_attribute("code", "E500");
            record.add_attribute("attempt", 3i64);
            logger.emit(record);
        }

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        let events = &spans[0].events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Error");
        assert_eq!(
            events[0].attributes,
            vec![
                KeyValue::new("code", "E500"),
                KeyValue::new("attempt", 3i64),
            ]
        );
    }

    #[test]
    fn scalar_values_convert_losslessly() {
        assert_eq!(event_value(&AnyValue::Int(7)), Value::I64(7));
        assert_eq!(event_value(&AnyValue::Double(0.5)), Value::F64(0.5));
        assert_eq!(event_value(&AnyValue::Boolean(true)), Value::Bool(true));
        assert_eq!(
            event_value(&AnyValue::String("failed".into())),
            Value::String("failed".into())
        );
    }
}
