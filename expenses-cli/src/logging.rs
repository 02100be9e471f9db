use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const WORKSPACE_CRATES: [&str; 5] = [
    "expenses",
    "expenses_core",
    "expenses_ingest",
    "expenses_tagger",
    "expenses_sync",
];

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec!["warn".to_string()];
    directives.extend(WORKSPACE_CRATES.iter().map(|c| format!("{c}={level}")));
    directives.join(",")
}

/// `RUST_LOG` wins when set; otherwise info (debug with `--verbose`) for our
/// crates and warn for everything else. Logs go to stderr so stdout stays
/// clean for JSON output.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
