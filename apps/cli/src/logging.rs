//! Logging initialization for the command-line front end
//!
//! Command output goes to stdout; every log line goes to stderr so the
//! output stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str, json: bool) {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(level));

    if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr);
        subscriber.with(layer).init();
    } else {
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr);
        subscriber.with(layer).init();
    }
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

// The `fhir-filter` binary and the library share the `fhir_filter` target
fn default_directives(level: &str) -> String {
    format!("fhir_filter={}", level)
}
