use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics only; user-facing progress goes through the reporter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ORDO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    process::exit(ordo::cli::main());
}
