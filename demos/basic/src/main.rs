//! Runs the full pipeline against a local collector and shows the
//! log-to-trace correlation: the `tracing::error!` below is exported as a
//! log record and mirrored onto the active span as an `"Error"` event.
//!
//! Start a collector listening on 4317 (or let the export fail; stdout
//! exporters still print everything), then `cargo run`.

use std::error::Error;

use labs_telemetry::OtlpExporterOptions;
use opentelemetry::trace::{TraceContextExt, Tracer};
use opentelemetry::{global, KeyValue};

const EXPORTER_OPTIONS: &str = r#"
endpoint: http://localhost:4317
timeout_millis: 5000
"#;

#[derive(Debug)]
struct PaymentDeclined;

impl std::fmt::Display for PaymentDeclined {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "payment declined")
    }
}

impl Error for PaymentDeclined {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let options = OtlpExporterOptions::from_yaml(EXPORTER_OPTIONS)?;
    let providers = labs_telemetry::init_telemetry(&options)?;

    let tracer = global::tracer("basic-demo");
    let meter = global::meter("basic-demo");
    let orders = meter.u64_counter("orders_processed").build();

    tracer.in_span("process-order", |cx| {
        cx.span().set_attribute(KeyValue::new("order.id", "A-1001"));
        orders.add(1, &[KeyValue::new("outcome", "failed")]);

        // Exported as a log record, and mirrored onto the span above as an
        // "Error" event because the record carries attributes.
        tracing::error!(code = "E500", path = "/orders", "order processing failed");

        labs_telemetry::enrich::record_exception(&cx, &PaymentDeclined);
    });

    tracing::info!("demo finished");

    providers.shutdown()?;
    Ok(())
}
