//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never interleave with the conversation on
//! stdout. `RUST_LOG` overrides the level chosen from `--verbose`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const QUIET_FILTER: &str = "prchat=warn";
const VERBOSE_FILTER: &str = "prchat=debug";

/// Filter directive used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { QUIET_FILTER }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
