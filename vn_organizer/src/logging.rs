//! Diagnostic tracing for the command-line tool.
//!
//! Output goes to stderr so it never mixes with `show` output on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn` so edit outcomes that did not apply
/// are still reported.
///
/// # Example
/// ```bash
/// RUST_LOG=story_tree=debug,flowchart=debug vn-organizer render story.json --output story.png
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
