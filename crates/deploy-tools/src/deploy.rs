//! Deploy sequence
//!
//! Steps run serially against one host. The first failure aborts the
//! sequence; nothing is rolled back. Existence checks on the target keep
//! repeated deploys from redoing one-off work.

use anyhow::{Context, Result};
use xshell::{cmd, Shell};

use crate::nginx::{configure_nginx, NginxOptions};
use crate::remote::RemoteHost;
use crate::secret::generate_secret_key;
use crate::shell::{quote, set_env_line};
use crate::site::{DeployTarget, SITE_SUBFOLDERS};
use crate::templates;

pub const OS_PACKAGES: &str = "nginx git build-essential pkg-config curl";

const RUSTUP_INSTALL: &str =
    "curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y --profile minimal";

/// Everything a deploy run needs
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub target: DeployTarget,
    pub commit: String,
    pub nginx: NginxOptions,
}

type Step = fn(&mut dyn RemoteHost, &DeployPlan) -> Result<()>;

const STEPS: [(&str, Step); 9] = [
    ("install system packages", install_packages),
    ("create site folders", create_directory_structure),
    ("fetch source", get_latest_source),
    ("update settings", update_settings),
    ("build application", update_runtime),
    ("collect static files", update_static_files),
    ("migrate database", update_database),
    ("install service", configure_service),
    ("configure nginx", configure_proxy),
];

/// Run every step in order, stopping at the first failure
pub fn deploy(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    tracing::info!(host = %plan.target.host, commit = %plan.commit, "deploying");
    for (index, (name, step)) in STEPS.iter().enumerate() {
        tracing::info!("[{}/{}] {}", index + 1, STEPS.len(), name);
        step(host, plan).with_context(|| format!("step {} ({name}) failed", index + 1))?;
    }
    tracing::info!(host = %plan.target.host, "deploy finished");
    Ok(())
}

/// Commit checked out in the local working copy
pub fn local_head_commit() -> Result<String> {
    let sh = Shell::new().context("Failed to create shell")?;
    let commit = cmd!(sh, "git log -n 1 --format=%H")
        .read()
        .context("Failed to read local HEAD commit")?;
    Ok(commit.trim().to_string())
}

fn install_packages(host: &mut dyn RemoteHost, _plan: &DeployPlan) -> Result<()> {
    host.sudo("apt-get update -q")?;
    host.sudo(&format!("DEBIAN_FRONTEND=noninteractive apt-get install -y -q {OS_PACKAGES}"))?;
    Ok(())
}

fn create_directory_structure(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    let site = plan.target.site();
    for folder in SITE_SUBFOLDERS {
        host.run(&format!("mkdir -p {}", quote(&site.folder(folder))))?;
    }
    Ok(())
}

fn get_latest_source(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    let source = quote(&plan.target.site().source());
    if host.exists(&format!("{}/.git", plan.target.site().source()))? {
        host.run(&format!("cd {source} && git fetch"))?;
    } else {
        host.run(&format!("git clone {} {source}", quote(&plan.target.repo_url)))?;
    }
    host.run(&format!("cd {source} && git reset --hard {}", quote(&plan.commit)))?;
    Ok(())
}

fn update_settings(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    let site = plan.target.site();
    let settings = site.settings_file();
    let values = [
        ("SUPERLISTS_DEBUG", "false".to_string()),
        ("SUPERLISTS_ALLOWED_HOSTS", plan.target.host.clone()),
        ("SUPERLISTS_DATABASE", site.database_file()),
        ("SUPERLISTS_STATIC_ROOT", site.static_root()),
        ("SUPERLISTS_BIND", format!("127.0.0.1:{}", plan.target.app_port)),
    ];
    for (key, value) in &values {
        host.run(&set_env_line(&settings, key, value))?;
    }

    let secret = site.secret_file();
    if !host.exists(&secret)? {
        let line = format!("SUPERLISTS_SECRET_KEY={}\n", generate_secret_key());
        host.put(&line, &secret, false)?;
        host.run(&format!("chmod 600 {}", quote(&secret)))?;
        tracing::info!(path = %secret, "generated secret key");
    }
    Ok(())
}

fn update_runtime(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    let cargo = plan.target.cargo();
    if !host.exists(&cargo)? {
        host.run(RUSTUP_INSTALL)?;
    }
    let site = plan.target.site();
    host.run(&format!(
        "cd {} && {} install --locked --force --path server --root {}",
        quote(&site.source()),
        quote(&cargo),
        quote(&site.virtualenv()),
    ))?;
    Ok(())
}

fn update_static_files(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    let site = plan.target.site();
    host.run(&format!(
        "cd {} && {} collectstatic --destination {}",
        quote(&site.source()),
        quote(&site.binary()),
        quote(&site.static_root()),
    ))?;
    Ok(())
}

fn update_database(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    let site = plan.target.site();
    host.run(&format!(
        "cd {} && {} migrate --database {}",
        quote(&site.source()),
        quote(&site.binary()),
        quote(&site.database_file()),
    ))?;
    Ok(())
}

fn configure_service(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    let service = plan.target.service_name();
    let unit_path = format!("/etc/systemd/system/{service}");
    host.put(&templates::systemd_unit(&plan.target), &unit_path, true)?;
    host.sudo("systemctl daemon-reload")?;
    host.sudo(&format!("systemctl enable {}", quote(&service)))?;
    host.sudo(&format!("systemctl restart {}", quote(&service)))?;
    Ok(())
}

fn configure_proxy(host: &mut dyn RemoteHost, plan: &DeployPlan) -> Result<()> {
    configure_nginx(host, &plan.target, &plan.nginx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Recorded, RecordingHost};
    use crate::secret::{SECRET_ALPHABET, SECRET_LENGTH};

    fn plan() -> DeployPlan {
        DeployPlan {
            target: DeployTarget::new("superlists.example.com", "deploy"),
            commit: "abc123".to_string(),
            nginx: NginxOptions::default(),
        }
    }

    const SITE: &str = "/home/deploy/sites/superlists.example.com";

    #[test]
    fn test_fresh_host_clones_and_generates_secret() {
        let mut host = RecordingHost::default();
        deploy(&mut host, &plan()).unwrap();

        let commands = host.commands();
        assert!(commands.iter().any(|c| c.starts_with("git clone")
            && c.contains("https://github.com/djangulo/superlists.git")
            && c.ends_with(&format!("{SITE}/source"))));
        assert!(!commands.iter().any(|c| c.contains("git fetch")));
        let reset = format!("cd {SITE}/source && git reset --hard abc123");
        assert!(commands.contains(&reset.as_str()));

        let secret = host
            .uploaded(&format!("{SITE}/source/secret_key.env"))
            .expect("secret written");
        let key = secret
            .trim_end()
            .strip_prefix("SUPERLISTS_SECRET_KEY=")
            .expect("key line");
        assert_eq!(key.len(), SECRET_LENGTH);
        assert!(key.bytes().all(|b| SECRET_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_existing_checkout_fetches_and_keeps_secret() {
        let mut host = RecordingHost::with_existing([
            format!("{SITE}/source/.git"),
            format!("{SITE}/source/secret_key.env"),
            "/home/deploy/.cargo/bin/cargo".to_string(),
        ]);
        deploy(&mut host, &plan()).unwrap();

        let commands = host.commands();
        assert!(commands.contains(&format!("cd {SITE}/source && git fetch").as_str()));
        assert!(!commands.iter().any(|c| c.contains("git clone")));
        assert!(!commands.iter().any(|c| c.contains("rustup")));
        assert!(host
            .uploaded(&format!("{SITE}/source/secret_key.env"))
            .is_none());
    }

    #[test]
    fn test_steps_run_in_order() {
        let mut host = RecordingHost::default();
        deploy(&mut host, &plan()).unwrap();

        let commands = host.commands();
        let position = |needle: &str| {
            commands
                .iter()
                .position(|c| c.contains(needle))
                .unwrap_or_else(|| panic!("missing {needle}"))
        };
        let order = [
            "apt-get install",
            "mkdir -p",
            "git clone",
            "SUPERLISTS_DEBUG",
            "install --locked",
            "collectstatic",
            "migrate --database",
            "systemctl restart",
            "nginx -s reload",
        ];
        for pair in order.windows(2) {
            assert!(position(pair[0]) < position(pair[1]), "{pair:?}");
        }
    }

    #[test]
    fn test_settings_point_into_site_folder() {
        let mut host = RecordingHost::default();
        deploy(&mut host, &plan()).unwrap();

        let commands = host.commands();
        assert!(commands
            .iter()
            .any(|c| c.contains("SUPERLISTS_ALLOWED_HOSTS=superlists.example.com")));
        assert!(commands
            .iter()
            .any(|c| c.contains(&format!("SUPERLISTS_DATABASE={SITE}/database/db.sqlite3"))));
        assert!(commands
            .iter()
            .any(|c| c.contains("SUPERLISTS_BIND=127.0.0.1:8000")));
    }

    #[test]
    fn test_failure_aborts_later_steps() {
        let mut host = RecordingHost {
            fail_on: Some("git clone".to_string()),
            ..Default::default()
        };
        let err = deploy(&mut host, &plan()).unwrap_err();

        assert!(format!("{err:#}").contains("fetch source"));
        assert!(!host.commands().iter().any(|c| c.contains("git reset")));
        assert!(!host.log.iter().any(|e| matches!(e, Recorded::Put { .. })));
    }

    #[test]
    fn test_service_unit_installed_with_sudo() {
        let mut host = RecordingHost::default();
        deploy(&mut host, &plan()).unwrap();

        assert!(host.log.iter().any(|e| matches!(
            e,
            Recorded::Put { path, sudo: true, .. }
                if path == "/etc/systemd/system/superlists-superlists.example.com.service"
        )));
    }
}
