// Logging is powered by tracing-subscriber. Its default `tracing-log` bridge
// picks up the `log` records emitted by actix's request logger.

use tracing_subscriber::EnvFilter;

/// Quieter levels for chatty dependencies, appended after the base level.
const NOISY_TARGETS: &[(&str, &str)] = &[
    ("actix_server", "warn"),
    ("actix_http", "warn"),
    ("h2", "warn"),
    ("hyper", "warn"),
    ("reqwest", "warn"),
    ("rustls", "warn"),
];

fn build_env_filter(level: &str) -> EnvFilter {
    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY_TARGETS {
        directives.push(format!("{}={}", target, lvl));
    }
    let filter = directives.join(",");
    EnvFilter::try_new(&filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{}': {}, falling back to info", filter, e);
        EnvFilter::new("info")
    })
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// built-in defaults when set.
pub fn init_logging() {
    let filter = match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => build_env_filter(value.trim()),
        _ => build_env_filter("info"),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
