use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console logging on stderr so `--json` output stays clean. `RUST_LOG`
/// overrides the verbosity flag.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("releasefeed={}", level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
