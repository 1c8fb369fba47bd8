//! Tracing initialization and subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::exporter;
use crate::Config;

const SERVICE_NAME: &str = "gifscout";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from `config.trace_level`,
/// else `"info"`. Human-readable events go to stderr. When
/// `config.trace_file` is set, spans are additionally exported as JSON lines
/// to that file through OpenTelemetry, which is what links each fetch span to
/// the session span that issued it.
///
/// Idempotent: only the first call installs a subscriber.
///
/// # Example
///
/// ```rust
/// use gifscout::observability::init_tracing;
/// use gifscout::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let otel_layer = config.trace_file.as_ref().map(|path| {
        let provider = exporter::create_tracer_provider(path.clone(), SERVICE_NAME);
        OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
