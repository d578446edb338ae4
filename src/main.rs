//! `order-cleaner` command-line entry point.

use std::io::{self, IsTerminal};

use clap::Parser;
use order_cleaner::cli::Cli;
use order_cleaner::logging::{LogConfig, init_logging};
use order_cleaner::pipeline::{PipelineConfig, run};
use tracing::info;

fn main() {
    let config = PipelineConfig::from(Cli::parse());

    let log_config =
        LogConfig::new(config.log_level, &config.log_dir).with_ansi(io::stdout().is_terminal());
    match init_logging(&log_config) {
        Ok(path) => info!("Logging initialized at {}", path.display()),
        Err(error) => {
            eprintln!("error: failed to initialize logging: {error}");
            std::process::exit(1);
        }
    }

    std::process::exit(run(&config).code());
}
