use tracing_subscriber::EnvFilter;

/// Installs the global log subscriber.
///
/// Logs go to stderr so stdout stays free for confirmations and JSON
/// progress. The library logs through the `log` facade; the subscriber's
/// `tracing-log` bridge picks those records up.
///
/// `RUST_LOG` wins when set. Otherwise the level is Debug in development
/// builds and Info in release builds; `-v` raises it to Debug and `-vv` to
/// Trace.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 if cfg!(debug_assertions) => "debug",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
