//! Superlists deployment
//!
//! Provisions a Debian-style host over ssh: source checkout, settings,
//! build, systemd service, nginx and Let's Encrypt certificates.

pub mod certs;
pub mod cli;
pub mod deploy;
pub mod nginx;
pub mod remote;
pub mod secret;
pub mod shell;
pub mod site;
pub mod templates;

pub use deploy::{deploy, DeployPlan};
pub use remote::{RecordingHost, RemoteHost, SshHost};
pub use site::DeployTarget;
