//! Command-line interface of `superlists-deploy`

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::certs::{configure_ssl, get_ssl_cert};
use crate::deploy::{deploy, local_head_commit, DeployPlan};
use crate::nginx::{configure_nginx, NginxOptions};
use crate::remote::{RecordingHost, RemoteHost, SshHost};
use crate::site::{DeployTarget, REPO_URL};

#[derive(Parser, Debug)]
#[command(name = "superlists-deploy")]
#[command(about = "Provision a host and deploy superlists to it", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the commands instead of running them; nothing counts as existing
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Site name; also the ssh host
    #[arg(long, global = true, env = "SUPERLISTS_DEPLOY_HOST")]
    pub host: Option<String>,

    /// Remote user owning the site folder
    #[arg(long, global = true, env = "SUPERLISTS_DEPLOY_USER")]
    pub user: Option<String>,

    #[arg(long, global = true, default_value_t = 22)]
    pub ssh_port: u16,

    /// Port the application listens on behind nginx
    #[arg(long, global = true, default_value_t = 8000)]
    pub app_port: u16,

    #[arg(long, global = true, default_value = REPO_URL)]
    pub repo_url: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct NginxArgs {
    /// Mark the server blocks as default_server
    #[arg(long)]
    pub default_server: bool,

    /// Do not alias /static to the site's static folder
    #[arg(long)]
    pub no_static: bool,

    /// Do not alias /media to the site's media folder
    #[arg(long)]
    pub no_media: bool,

    /// nginx client_max_body_size, e.g. 10M
    #[arg(long)]
    pub client_max_body_size: Option<String>,

    /// Serve https with a previously obtained certificate
    #[arg(long)]
    pub ssl: bool,

    /// Redirect plain http to https
    #[arg(long)]
    pub ssl_redirect: bool,
}

impl From<&NginxArgs> for NginxOptions {
    fn from(args: &NginxArgs) -> Self {
        let options = NginxOptions {
            default_server: args.default_server,
            ssl_redirect: args.ssl_redirect,
            static_alias: !args.no_static,
            media_alias: !args.no_media,
            client_max_body_size: args.client_max_body_size.clone(),
            ..Default::default()
        };
        if args.ssl {
            options.with_ssl()
        } else {
            options
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full deploy sequence
    Deploy {
        /// Commit to check out; defaults to the local HEAD
        #[arg(long)]
        commit: Option<String>,

        #[command(flatten)]
        nginx: NginxArgs,
    },

    /// Obtain a Let's Encrypt certificate for the site
    #[command(name = "get-ssl-cert")]
    GetSslCert {
        /// Contact address for certificate expiry notices
        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        nginx: NginxArgs,
    },

    /// Enable https using the obtained certificate
    #[command(name = "configure-ssl")]
    ConfigureSsl {
        #[command(flatten)]
        nginx: NginxArgs,
    },

    /// Only (re)install the nginx site config
    #[command(name = "configure-nginx")]
    ConfigureNginx {
        #[command(flatten)]
        nginx: NginxArgs,
    },
}

impl TargetArgs {
    pub fn resolve(&self) -> Result<DeployTarget> {
        let host = self
            .host
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--host is required"))?;
        let user = match &self.user {
            Some(user) => user.clone(),
            None => std::env::var("USER").map_err(|_| anyhow::anyhow!("--user is required"))?,
        };
        Ok(DeployTarget {
            host,
            user,
            ssh_port: self.ssh_port,
            app_port: self.app_port,
            repo_url: self.repo_url.clone(),
        })
    }
}

/// Execute the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let target = cli.target.resolve()?;
    let mut host: Box<dyn RemoteHost> = if cli.dry_run {
        Box::new(RecordingHost::dry_run())
    } else {
        Box::new(SshHost::new(&target.user, &target.host, target.ssh_port)?)
    };
    let host = host.as_mut();

    match cli.command {
        Command::Deploy { commit, nginx } => {
            let commit = match commit {
                Some(commit) => commit,
                None => local_head_commit()?,
            };
            let plan = DeployPlan {
                target,
                commit,
                nginx: NginxOptions::from(&nginx),
            };
            deploy(host, &plan)
        }
        Command::GetSslCert { email, nginx } => {
            get_ssl_cert(host, &target, email.as_deref(), &NginxOptions::from(&nginx))
        }
        Command::ConfigureSsl { nginx } => {
            configure_ssl(host, &target, &NginxOptions::from(&nginx))
        }
        Command::ConfigureNginx { nginx } => {
            configure_nginx(host, &target, &NginxOptions::from(&nginx))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deploy_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "superlists-deploy",
            "deploy",
            "--host",
            "superlists.example.com",
            "--user",
            "deploy",
            "--commit",
            "abc123",
            "--dry-run",
        ])
        .unwrap();

        assert!(cli.dry_run);
        let target = cli.target.resolve().unwrap();
        assert_eq!(target.host, "superlists.example.com");
        assert_eq!(target.ssh_port, 22);
        assert!(matches!(
            cli.command,
            Command::Deploy { commit: Some(ref c), .. } if c == "abc123"
        ));
    }

    #[test]
    fn test_nginx_args_map_to_options() {
        let args = NginxArgs {
            default_server: true,
            no_media: true,
            client_max_body_size: Some("10M".to_string()),
            ..Default::default()
        };
        let options = NginxOptions::from(&args);
        assert!(options.default_server);
        assert!(options.static_alias);
        assert!(!options.media_alias);
        assert!(!options.ssl);

        let ssl = NginxOptions::from(&NginxArgs {
            ssl: true,
            ..Default::default()
        });
        assert!(ssl.ssl && ssl.ssl_redirect && ssl.acme);
    }

    #[test]
    fn test_ssl_redirect_flag() {
        let cli = Cli::try_parse_from([
            "superlists-deploy",
            "configure-nginx",
            "--host",
            "superlists.example.com",
            "--ssl-redirect",
        ])
        .unwrap();
        let Command::ConfigureNginx { nginx } = cli.command else {
            panic!("expected configure-nginx");
        };
        let options = NginxOptions::from(&nginx);
        assert!(options.ssl_redirect);
        assert!(!options.ssl);
    }

    #[test]
    fn test_dry_run_configure_nginx_succeeds() {
        let cli = Cli::try_parse_from([
            "superlists-deploy",
            "--host",
            "superlists.example.com",
            "--user",
            "deploy",
            "--dry-run",
            "configure-nginx",
        ])
        .unwrap();
        assert!(run(cli).is_ok());
    }
}
