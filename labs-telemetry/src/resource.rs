//! Service identity for emitted telemetry.
//!
//! The service name and version are resolved from environment variables once
//! at pipeline construction and attached, together with host metadata, to a
//! single [`Resource`] shared by the trace, metric, and log providers.

use std::env;

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;

use crate::enrich::HostMetadataDetector;

/// Environment variable holding the service name reported with telemetry.
pub const ENV_SERVICE_NAME: &str = "serviceName";
/// Environment variable holding the service version reported with telemetry.
pub const ENV_SERVICE_VERSION: &str = "serviceVersion";

const FALLBACK_SERVICE_NAME: &str = "Labs.API";
const FALLBACK_SERVICE_VERSION: &str = "version unknown";

/// Service name from [`ENV_SERVICE_NAME`], or `"Labs.API"` when the variable
/// is unset or empty.
pub fn service_name() -> String {
    env::var(ENV_SERVICE_NAME)
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_SERVICE_NAME.to_owned())
}

/// Service version from [`ENV_SERVICE_VERSION`], or `"version unknown"` when
/// the variable is unset or empty.
pub fn service_version() -> String {
    env::var(ENV_SERVICE_VERSION)
        .ok()
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| FALLBACK_SERVICE_VERSION.to_owned())
}

/// Builds the resource shared by all three signal providers: service
/// identity plus the host metadata detected by [`HostMetadataDetector`].
pub fn telemetry_resource() -> Resource {
    Resource::builder()
        .with_service_name(service_name())
        .with_attribute(KeyValue::new(SERVICE_VERSION, service_version()))
        .with_detector(Box::new(HostMetadataDetector))
        .build()
}
