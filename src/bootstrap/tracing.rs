//! Tracing configuration for Keysign
//!
//! Installs a `tracing-subscriber` registry with an env-filter and a stdout
//! fmt layer. Call once, before the wizard is built.

use std::io;

use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives, used when `RUST_LOG` is unset or invalid.
///
/// - **Development**: debug for everything
/// - **Production**: info for everything
/// - HTTP client internals stay at warn either way
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        if is_dev { "ks_app=debug" } else { "ks_app=info" }.to_string(),
        if is_dev {
            "ks_infra=debug"
        } else {
            "ks_infra=info"
        }
        .to_string(),
    ]
}

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`; otherwise falls back to [`build_filter_directives`].
/// Output looks like `2025-01-15 10:30:45.123 INFO [file.rs:42] target: message`.
///
/// ```ignore
/// keysign::bootstrap::tracing::init_tracing_subscriber()?;
/// ```
///
/// # Errors
///
/// Fails if a global subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives.join(",")));

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(BoxMakeWriter::new(io::stdout));

    registry().with(env_filter).with(stdout_layer).try_init()?;

    Ok(())
}
