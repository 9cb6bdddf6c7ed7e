use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Console logging with an env-driven filter. Must be initialized before
/// anything else logs.
pub fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
