//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set. Otherwise the level follows `APP_DEBUG`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is not set
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug,sqlx=info,hyper=info"
    } else {
        "info,sqlx=warn"
    }
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
