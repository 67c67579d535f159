//! Process-wide diagnostic logging.
//!
//! Log level is controlled by:
//! 1. `--debug` flag sets level to DEBUG
//! 2. `RUST_LOG` environment variable (if set)
//! 3. Default is INFO
//!
//! The filter sits behind a reload handle so a command can switch the whole
//! process to debug output after parsing its flags. Only the command
//! controller calls [`enable`], once, at the start of an invocation; every
//! other module just logs through `tracing` and inherits the level.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "platkit=info";
const DEBUG_FILTER: &str = "platkit=debug";

static DEBUG: AtomicBool = AtomicBool::new(false);
static FILTER: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

fn filter_for(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init(debug: bool) {
    if debug {
        DEBUG.store(true, Ordering::SeqCst);
    }

    let (filter, handle) = reload::Layer::new(filter_for(debug));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok();

    if installed {
        let _ = FILTER.set(handle);
    }
}

/// Turn on debug logging for the rest of the process.
pub fn enable() {
    DEBUG.store(true, Ordering::SeqCst);
    if let Some(handle) = FILTER.get() {
        if let Err(e) = handle.modify(|filter| *filter = EnvFilter::new(DEBUG_FILTER)) {
            tracing::warn!("Could not raise log level: {}", e);
        }
    }
}

/// Whether debug diagnostics are on for this process.
pub fn is_enabled() -> bool {
    DEBUG.load(Ordering::SeqCst)
}
