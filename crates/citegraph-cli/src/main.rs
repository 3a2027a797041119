//! Main entry point for the citegraph command-line tool.

use anyhow::Context;
use citegraph_cli::{App, Args, Outcome};
use citegraph_common::init_logging;
use citegraph_config::ConfigLoader;
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    let mut logging = config.logging.to_logging_config();
    if let Some(level) = &args.log_level {
        logging.level = level.to_ascii_lowercase();
    }
    init_logging(logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting citegraph {}", env!("CARGO_PKG_VERSION"));

    let app = App::new(config);
    match app.run(args.command).await {
        Ok(Outcome::Rendered(report)) => {
            info!(
                "Rendered {} charts for {} publications; wide table at {}",
                report.rendered(),
                report.publications,
                report.wide_csv.display()
            );
        }
        Ok(Outcome::Reshaped {
            path,
            publications,
            dates,
        }) => {
            info!(
                "Wrote {} publications over {} dates to {}",
                publications,
                dates,
                path.display()
            );
        }
        Ok(Outcome::Appended { rows }) => {
            info!("Appended {} observations", rows);
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
