//! Telemetry bootstrap for Labs services.
//!
//! This crate assembles the OpenTelemetry trace, metric, and log pipelines
//! behind one call and adds the pieces Labs services share:
//!
//! - Service identity resolved from the `serviceName` / `serviceVersion`
//!   environment variables, with host metadata attached to the shared
//!   resource.
//! - OTLP exporters for all three signals configured from a single
//!   [`OtlpExporterOptions`] value, alongside stdout exporters for local
//!   inspection.
//! - [`SpanEventLogProcessor`] on the log pipeline, mirroring the attributes
//!   of each log record onto the currently active span as an `"Error"` span
//!   event.
//! - A `tracing` subscriber bridging events into the log pipeline.
//!
//! # Getting started
//!
//! ```no_run
//! use labs_telemetry::OtlpExporterOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = OtlpExporterOptions::from_yaml_file("telemetry.yaml")?;
//!     let providers = labs_telemetry::init_telemetry(&options)?;
//!
//!     // Emitted inside a traced operation, the attributes below also land
//!     // on the active span as an "Error" span event.
//!     tracing::error!(code = "E500", path = "/orders", "order processing failed");
//!
//!     providers.shutdown()?;
//!     Ok(())
//! }
//! ```

#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(test, deny(warnings))]

pub mod config;
pub mod enrich;
mod error;
pub mod init;
mod otlp;
pub mod processor;
pub mod resource;

pub use config::OtlpExporterOptions;
pub use error::Error;
pub use init::{init_telemetry, TelemetryProviders};
pub use processor::SpanEventLogProcessor;
