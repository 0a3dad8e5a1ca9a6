mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use reg_logger::Logger;
use registry::domain::config::RegistryConfig;
use registry::kernel::config::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let cfg: RegistryConfig =
        load_config(Some(&cli.config)).context("Critical: Configuration is malformed")?;
    let _log = Logger::from_config(&cfg.logging)?;

    commands::run(cli, cfg).await
}
