//! Runs one aggregation against the configured API, prints the assembled posts
//! and the elapsed milliseconds to stdout, then waits out the grace period.

use post_aggregator::{Config, aggregate_posts, wait_for_shutdown};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::default();

    let filter =
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let code = match aggregate_posts(&config).await {
        Ok(report) => match serde_json::to_string_pretty(&report.posts) {
            Ok(rendered) => {
                println!("{}", rendered);
                println!("{}", report.elapsed_ms());
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to render result");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, kind = %e.kind(), "aggregation failed");
            eprintln!("error: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    };

    wait_for_shutdown(config.shutdown_grace).await;
    code
}
