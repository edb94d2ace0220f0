// Subscriber setup for the `conduit-plan` binary.
//
// The router crates only emit `tracing` events; this is the one place a
// subscriber is installed. Output goes to stderr so stdout stays free for
// the JSON response.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Build the event filter. `--verbose` wins over `RUST_LOG`; otherwise
/// `RUST_LOG` is honored and falls back to `info`.
pub fn build_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(default_directive(true));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
}

/// Install the global fmt subscriber. Call once, at startup.
pub fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
