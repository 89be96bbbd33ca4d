use clap::Parser;
use tracing_subscriber::EnvFilter;

use td::cli::Cli;
use td::{commands, output};

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = commands::handle(cli).await {
        output::error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

/// Quiet by default; `RUST_LOG` opens it up. Diagnostics go to stderr so
/// they never interleave with tables on stdout.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
