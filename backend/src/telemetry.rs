use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `fallback` is used when `RUST_LOG` is unset or unparsable.
pub fn init_telemetry(fallback: &str) {
    let default_filter = format!("tcg_results_backend={fallback},actix_web={fallback}");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
