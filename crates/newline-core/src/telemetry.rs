//! Log output for the newline-fix binary.
//!
//! Log lines go to stderr. Stdout is left to workflow commands such as
//! `::error::`, which the runner parses line by line.

use std::io;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level` when set. Returns `false` if a subscriber was
/// already installed, in which case nothing changes.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(false)
            .with_writer(io::stderr)
    });
    let text_layer = (!json).then(|| fmt::layer().with_target(false).with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok()
}
