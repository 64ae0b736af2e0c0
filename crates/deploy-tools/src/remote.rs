//! Remote host abstraction
//!
//! Every deploy step talks to the target through [`RemoteHost`], so the
//! same sequence can run over ssh, print itself in dry-run mode, or be
//! recorded in tests.

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use xshell::{cmd, Shell};

use crate::shell::quote;

/// Operations a deploy step may perform on the target machine
pub trait RemoteHost {
    /// Run `command` as the deploy user, returning its trimmed stdout
    fn run(&mut self, command: &str) -> Result<String>;

    /// Run `command` as root
    fn sudo(&mut self, command: &str) -> Result<String>;

    /// Whether `path` exists on the target
    fn exists(&mut self, path: &str) -> Result<bool>;

    /// Write `contents` to `path`, as root when `use_sudo` is set
    fn put(&mut self, contents: &str, path: &str, use_sudo: bool) -> Result<()>;
}

/// Runs commands through the local `ssh` client
pub struct SshHost {
    sh: Shell,
    destination: String,
    port: u16,
}

impl SshHost {
    pub fn new(user: &str, host: &str, port: u16) -> Result<Self> {
        let sh = Shell::new().context("creating local shell")?;
        Ok(Self {
            sh,
            destination: format!("{user}@{host}"),
            port,
        })
    }

    fn ssh(&self, remote: &str) -> xshell::Cmd<'_> {
        let sh = &self.sh;
        let destination = &self.destination;
        let port = self.port.to_string();
        cmd!(sh, "ssh -o BatchMode=yes -p {port} {destination} {remote}")
    }
}

impl RemoteHost for SshHost {
    fn run(&mut self, command: &str) -> Result<String> {
        tracing::debug!(%command, "run");
        self.ssh(command)
            .read()
            .with_context(|| format!("remote command failed: {command}"))
    }

    fn sudo(&mut self, command: &str) -> Result<String> {
        tracing::debug!(%command, "sudo");
        self.ssh(&format!("sudo sh -c {}", quote(command)))
            .read()
            .with_context(|| format!("remote sudo command failed: {command}"))
    }

    fn exists(&mut self, path: &str) -> Result<bool> {
        let output = self
            .ssh(&format!("test -e {}", quote(path)))
            .ignore_status()
            .quiet()
            .output()
            .with_context(|| format!("checking {path}"))?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => bail!("checking {path}: ssh exited with {code:?}"),
        }
    }

    fn put(&mut self, contents: &str, path: &str, use_sudo: bool) -> Result<()> {
        tracing::debug!(%path, use_sudo, "put");
        let remote = if use_sudo {
            format!("sudo tee {} > /dev/null", quote(path))
        } else {
            format!("cat > {}", quote(path))
        };
        self.ssh(&remote)
            .stdin(contents)
            .quiet()
            .run()
            .with_context(|| format!("uploading {path}"))
    }
}

/// One operation captured by [`RecordingHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Run(String),
    Sudo(String),
    Exists(String),
    Put {
        path: String,
        contents: String,
        sudo: bool,
    },
}

/// Records operations instead of executing them
///
/// Backs `--dry-run` (with `echo` on) and the step tests. Paths listed in
/// `existing` answer `true` to [`RemoteHost::exists`]; a command containing
/// `fail_on` fails.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub existing: HashSet<String>,
    pub fail_on: Option<String>,
    pub echo: bool,
    pub log: Vec<Recorded>,
}

impl RecordingHost {
    pub fn dry_run() -> Self {
        Self {
            echo: true,
            ..Default::default()
        }
    }

    pub fn with_existing<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            existing: paths.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Commands passed to `run` or `sudo`, in order
    pub fn commands(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|entry| match entry {
                Recorded::Run(c) | Recorded::Sudo(c) => Some(c.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Contents last uploaded to `path`
    pub fn uploaded(&self, path: &str) -> Option<&str> {
        self.log.iter().rev().find_map(|entry| match entry {
            Recorded::Put { path: p, contents, .. } if p == path => Some(contents.as_str()),
            _ => None,
        })
    }

    fn execute(&mut self, entry: Recorded, command: &str) -> Result<String> {
        if self.echo {
            match &entry {
                Recorded::Sudo(c) => println!("sudo: {c}"),
                _ => println!("run: {command}"),
            }
        }
        self.log.push(entry);
        match &self.fail_on {
            Some(needle) if command.contains(needle.as_str()) => {
                bail!("remote command failed: {command}")
            }
            _ => Ok(String::new()),
        }
    }
}

impl RemoteHost for RecordingHost {
    fn run(&mut self, command: &str) -> Result<String> {
        self.execute(Recorded::Run(command.to_string()), command)
    }

    fn sudo(&mut self, command: &str) -> Result<String> {
        self.execute(Recorded::Sudo(command.to_string()), command)
    }

    fn exists(&mut self, path: &str) -> Result<bool> {
        self.log.push(Recorded::Exists(path.to_string()));
        Ok(self.existing.contains(path))
    }

    fn put(&mut self, contents: &str, path: &str, use_sudo: bool) -> Result<()> {
        if self.echo {
            println!("put{}: {path}", if use_sudo { " (sudo)" } else { "" });
        }
        self.log.push(Recorded::Put {
            path: path.to_string(),
            contents: contents.to_string(),
            sudo: use_sudo,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_host_answers_existing_paths() {
        let mut host = RecordingHost::with_existing(["/srv/a"]);
        assert!(host.exists("/srv/a").unwrap());
        assert!(!host.exists("/srv/b").unwrap());
    }

    #[test]
    fn test_recording_host_fails_on_match() {
        let mut host = RecordingHost {
            fail_on: Some("git clone".to_string()),
            ..Default::default()
        };
        assert!(host.run("mkdir -p /srv").is_ok());
        let err = host.run("git clone repo src").unwrap_err();
        assert!(err.to_string().contains("git clone"));
        assert_eq!(host.commands(), vec!["mkdir -p /srv", "git clone repo src"]);
    }

    #[test]
    fn test_uploaded_returns_latest() {
        let mut host = RecordingHost::default();
        host.put("one", "/etc/x", true).unwrap();
        host.put("two", "/etc/x", true).unwrap();
        assert_eq!(host.uploaded("/etc/x"), Some("two"));
        assert_eq!(host.uploaded("/etc/y"), None);
    }
}
