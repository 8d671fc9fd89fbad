use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Human-readable console lines by default;
/// set `MANNAM_LOG_FORMAT=json` for one JSON object per line, which is what
/// the log collector expects in deployment.
pub fn init_tracing(service_name: &str) {
    // RUST_LOG wins when set; the fallback filter names the crate by its
    // module path, so hyphens become underscores.
    let crate_target = service_name.replace('-', "_");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{crate_target}=debug")));

    let json = std::env::var("MANNAM_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(true),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    tracing::info!(service = service_name, json, "tracing initialized");
}
