//! Dust Storm Event Processor
//!
//! A batch pipeline that, for each configured year:
//! 1. Reads the year's storm-event CSV archive
//! 2. Normalizes loss figures and converts timestamps to UTC
//! 3. Applies the configured dust search filter
//! 4. Aggregates retained events into episodes
//!
//! and finally writes one output package (CSV tables, JSON bundle, and the
//! run transcript).
//!
//! Usage:
//!   cargo run --release                      # Use ./run.toml
//!   cargo run --release -- --config my.toml  # Use an alternate config file
//!
//! The run aborts without writing anything if a configured year's source
//! file is missing or the output package directory already exists.

use std::env;

use dustproc_service::config;
use dustproc_service::logging::{self, LogLevel, Stage};
use dustproc_service::pipeline;

fn main() {
    println!("🌪 Dust Storm Event Processor");
    println!("=============================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path = "run.toml".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH]", args[0]);
                std::process::exit(1);
            }
        }
    }

    logging::init(LogLevel::Info);

    println!("📄 Loading configuration from {}...", config_path);
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ Configuration loaded\n");

    match pipeline::run(&config) {
        Ok(result) => {
            println!("\n✓ Run complete");
            println!(
                "   {} of {} events retained across {} year(s), {} episodes",
                result.events.len(),
                result.count_all_events,
                result.years.len(),
                result.episodes.len()
            );
            println!("   Package written to {}", config.package_path().display());
        }
        Err(e) => {
            logging::error(Stage::System, None, &e.to_string());
            eprintln!("\n❌ Run failed: {}\n", e);
            std::process::exit(1);
        }
    }
}
