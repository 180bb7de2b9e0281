//! Trace enrichment that runs independently of log correlation.
//!
//! Host metadata is constant for the lifetime of the process, so it is
//! detected once and attached to the shared resource rather than copied
//! onto each span. Exception details are recorded per span on demand via
//! [`record_exception`].

use std::env;
use std::error::Error as StdError;

use opentelemetry::trace::TraceContextExt;
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::resource::ResourceDetector;
use opentelemetry_sdk::Resource;
use sysinfo::System;

/// Environment variable carrying the deployment-assigned host identifier.
pub const ENV_HOST_ID: &str = "HOST_ID";

const HOST_ID: &str = "host.id";
const HOST_NAME: &str = "host.name";
const HOST_TYPE: &str = "host.type";
const HOST_VERSION: &str = "host.version";

/// Detects host metadata for the shared telemetry resource.
///
/// Reports `host.type` (OS family) and, when available, `host.name` (machine
/// hostname), `host.version` (OS version), and `host.id` from the
/// [`ENV_HOST_ID`] environment variable.
#[derive(Debug)]
pub struct HostMetadataDetector;

impl ResourceDetector for HostMetadataDetector {
    fn detect(&self) -> Resource {
        let mut attributes = vec![KeyValue::new(HOST_TYPE, env::consts::OS)];
        if let Some(id) = env::var(ENV_HOST_ID).ok().filter(|id| !id.is_empty()) {
            attributes.push(KeyValue::new(HOST_ID, id));
        }
        if let Some(name) = System::host_name() {
            attributes.push(KeyValue::new(HOST_NAME, name));
        }
        if let Some(version) = System::os_version() {
            attributes.push(KeyValue::new(HOST_VERSION, version));
        }
        Resource::builder_empty()
            .with_attributes(attributes)
            .build()
    }
}

/// Records `err` on the span active in `cx`, tagging the underlying cause
/// as `exception.source` when one is present. Does nothing outside a traced
/// operation.
///
/// This is independent of the log correlation processor; both may annotate
/// the same span.
pub fn record_exception(cx: &Context, err: &dyn StdError) {
    if !cx.has_active_span() {
        return;
    }
    let span = cx.span();
    span.record_error(err);
    if let Some(source) = err.source() {
        span.set_attribute(KeyValue::new("exception.source", source.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{mark_span_as_active, Tracer, TracerProvider};
    use opentelemetry::Key;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use std::fmt;

    #[derive(Debug)]
    struct OrderError {
        cause: Option<ParseError>,
    }

    #[derive(Debug)]
    struct ParseError;

    impl fmt::Display for OrderError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "order rejected")
        }
    }

    impl fmt::Display for ParseError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "malformed payload")
        }
    }

    impl StdError for OrderError {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.cause.as_ref().map(|cause| cause as &dyn StdError)
        }
    }

    impl StdError for ParseError {}

    #[test]
    fn host_metadata_includes_id_when_env_set() {
        temp_env::with_var(ENV_HOST_ID, Some("host-42"), || {
            let resource = HostMetadataDetector.detect();
            assert_eq!(resource.get(&Key::new(HOST_ID)), Some("host-42".into()));
            assert!(resource.get(&Key::new(HOST_TYPE)).is_some());
        });
    }

    #[test]
    fn host_metadata_omits_id_when_env_unset() {
        temp_env::with_var(ENV_HOST_ID, None::<&str>, || {
            let resource = HostMetadataDetector.detect();
            assert_eq!(resource.get(&Key::new(HOST_ID)), None);
        });
    }

    #[test]
    fn exception_source_is_taken_from_the_cause() {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let tracer = provider.tracer("test");

        let span = tracer.start("operation");
        {
            let _guard = mark_span_as_active(span);
            let err = OrderError {
                cause: Some(ParseError),
            };
            Context::map_current(|cx| record_exception(cx, &err));
        }

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0]
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "exception.source"
                && kv.value.as_str() == "malformed payload"));
        assert!(spans[0].events.iter().any(|event| event.name == "exception"));
    }

    #[test]
    fn exception_without_cause_records_no_source() {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let tracer = provider.tracer("test");

        let span = tracer.start("operation");
        {
            let _guard = mark_span_as_active(span);
            let err = OrderError { cause: None };
            Context::map_current(|cx| record_exception(cx, &err));
        }

        let spans = exporter.get_finished_spans().unwrap();
        assert!(!spans[0]
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "exception.source"));
    }

    #[test]
    fn record_exception_outside_span_is_noop() {
        let err = OrderError { cause: None };
        Context::map_current(|cx| record_exception(cx, &err));
    }
}
