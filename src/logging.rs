//! Tracing subscriber setup for the command-line front end

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `tabconvert=info`, or
/// `tabconvert=debug` with `verbose`. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,tabconvert=debug"
    } else {
        "warn,tabconvert=info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
