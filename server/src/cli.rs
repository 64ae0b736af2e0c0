//! Command-line interface of the `superlists` binary
//!
//! Every server option can also come from a `SUPERLISTS_*` environment
//! variable; the deployed service loads them from env files.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{ServerConfig, DEFAULT_BIND, DEFAULT_MAX_BODY_BYTES};

#[derive(Parser, Debug)]
#[command(name = "superlists")]
#[command(about = "To-do list web application", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply migrations and serve HTTP
    Serve(ServeArgs),

    /// Create or upgrade the database schema, then exit
    Migrate {
        #[command(flatten)]
        database: DatabaseArgs,
    },

    /// Write bundled static assets into the static root
    #[command(name = "collectstatic")]
    CollectStatic {
        /// Directory the reverse proxy serves /static/ from
        #[arg(long, env = "SUPERLISTS_STATIC_ROOT", default_value = "static")]
        destination: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// SQLite database file
    #[arg(long, env = "SUPERLISTS_DATABASE", default_value = "db.sqlite3")]
    pub database: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "SUPERLISTS_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Directory served under /static/
    #[arg(long, env = "SUPERLISTS_STATIC_ROOT", default_value = "static")]
    pub static_root: PathBuf,

    /// Debug mode; turned off on deployed hosts
    #[arg(long, env = "SUPERLISTS_DEBUG", default_value_t = true, action = ArgAction::Set)]
    pub debug: bool,

    /// Comma-separated host names the server answers for
    #[arg(long, env = "SUPERLISTS_ALLOWED_HOSTS", value_delimiter = ',')]
    pub allowed_hosts: Vec<String>,

    #[arg(long, env = "SUPERLISTS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Maximum accepted request body, in bytes
    #[arg(long, env = "SUPERLISTS_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Also write daily log files here
    #[arg(long, env = "SUPERLISTS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            bind: args.bind,
            database: args.database.database,
            static_root: args.static_root,
            debug: args.debug,
            allowed_hosts: args
                .allowed_hosts
                .into_iter()
                .map(|host| host.trim().to_string())
                .filter(|host| !host.is_empty())
                .collect(),
            secret_key: args.secret_key,
            max_body_bytes: args.max_body_bytes,
            log_dir: args.log_dir,
        }
    }
}
