use anyhow::Result;
use clap::Parser;

use superlists_lib::cli::{Cli, Command};
use superlists_lib::{collect_static, run_migrations, run_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let config = ServerConfig::from(args);
            let logging = match &config.log_dir {
                Some(dir) => rolling_logger::init_logger(dir.clone(), "superlists"),
                None => rolling_logger::init_console_logger(),
            };
            logging.map_err(anyhow::Error::msg)?;
            run_server(config).await
        }
        Command::Migrate { database } => {
            rolling_logger::init_console_logger().map_err(anyhow::Error::msg)?;
            run_migrations(&database.database)
        }
        Command::CollectStatic { destination } => {
            rolling_logger::init_console_logger().map_err(anyhow::Error::msg)?;
            collect_static(&destination).map(|_| ())
        }
    }
}
