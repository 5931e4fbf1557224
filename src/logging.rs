//! Subscriber setup for the `taskboard` binary.
//!
//! Output goes to stderr so the task listing on stdout stays clean.

use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Dev also traces the HTTP client.
pub fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "taskboard_client=debug,reqwest=debug,info",
        Environment::Staging => "taskboard_client=debug,warn",
        Environment::Prod => "taskboard_client=info,warn",
    }
}

pub fn init_logging(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    let registry = tracing_subscriber::registry().with(filter);
    if env.is_prod() {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer.pretty()).init();
    }

    tracing::info!(env = ?env, "Logging initialized");
}
