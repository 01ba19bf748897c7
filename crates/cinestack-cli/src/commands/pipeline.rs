use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cinestack_core::pipeline::config::PipelineConfig;
use cinestack_core::pipeline::run_pipeline;

use crate::progress::ConsoleReporter;
use crate::summary;

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline config file (TOML)
    pub config: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    let config: PipelineConfig = toml::from_str(&contents).context("Invalid pipeline config")?;

    summary::print_pipeline_summary(&config);

    let reporter = ConsoleReporter::new()?;
    let report = run_pipeline(&config, &reporter)?;

    summary::print_report(&report);
    Ok(())
}
