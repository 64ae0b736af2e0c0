use anyhow::Result;
use clap::Parser;

use superlists_deploy::cli::{run, Cli};

fn main() -> Result<()> {
    rolling_logger::init_console_logger().map_err(anyhow::Error::msg)?;
    run(Cli::parse())
}
