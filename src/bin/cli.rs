//! FeatureLens CLI - feature-scoped dependency subgraphs.
//!
//! Usage:
//!   featurelens analyze --feature-id auth --seed src/login.ts -k session
//!   featurelens analyze --feature-id auth --seed src/login.ts --summary
//!   featurelens payload feature.json      # Run a JSON FeaturePayload
//!   featurelens stats                     # Project statistics

use clap::Parser;
use featurelens::cli::{run, Cli};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();

    if let Err(e) = run(cli, &mut stdout.lock()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
