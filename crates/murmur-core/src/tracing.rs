use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured JSON tracing on stdout. Call once at service startup.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (e.g. `"info,sqlx=warn"`)
/// is used. Subsequent calls are silently ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init();
}
