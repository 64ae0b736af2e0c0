//! Let's Encrypt certificates and TLS for the reverse proxy

use anyhow::{Context, Result};

use crate::nginx::{configure_nginx, ssl_snippet_path, NginxOptions, ACME_ROOT, SSL_PARAMS_SNIPPET};
use crate::remote::RemoteHost;
use crate::shell::quote;
use crate::site::DeployTarget;
use crate::templates;

pub const DHPARAM: &str = "/etc/ssl/certs/dhparam.pem";

pub fn letsencrypt_config_path(host: &str) -> String {
    format!("/etc/letsencrypt/configs/{host}.conf")
}

/// cron ignores files in `/etc/cron.d` whose names contain dots
pub fn cron_path(host: &str) -> String {
    format!("/etc/cron.d/certbot-{}", host.replace('.', "-"))
}

/// Obtain a certificate through the webroot challenge
pub fn get_ssl_cert(
    host: &mut dyn RemoteHost,
    target: &DeployTarget,
    email: Option<&str>,
    nginx: &NginxOptions,
) -> Result<()> {
    if !host.exists("/usr/bin/certbot")? {
        host.sudo("DEBIAN_FRONTEND=noninteractive apt-get install -y -q certbot")?;
    }

    host.sudo(&format!("mkdir -p {ACME_ROOT}"))?;
    host.sudo(&format!("chgrp www-data {ACME_ROOT}"))?;

    let config = letsencrypt_config_path(&target.host);
    if !host.exists(&config)? {
        host.sudo("mkdir -p /etc/letsencrypt/configs")?;
        host.put(&templates::letsencrypt_config(target, email), &config, true)?;
    }

    let options = NginxOptions {
        acme: true,
        ..nginx.clone()
    };
    configure_nginx(host, target, &options).context("enabling the acme challenge")?;

    host.sudo(&format!(
        "certbot certonly --non-interactive --config {}",
        quote(&config)
    ))
    .context("certbot failed")?;

    let cron = cron_path(&target.host);
    if !host.exists(&cron)? {
        host.put(&templates::certbot_cron(target), &cron, true)?;
    }
    tracing::info!(host = %target.host, "certificate obtained");
    Ok(())
}

/// Switch the site to https using an obtained certificate
pub fn configure_ssl(
    host: &mut dyn RemoteHost,
    target: &DeployTarget,
    nginx: &NginxOptions,
) -> Result<()> {
    if !host.exists(DHPARAM)? {
        host.sudo(&format!("openssl dhparam -out {DHPARAM} 2048"))?;
    }
    host.put(
        &templates::ssl_site_snippet(target),
        &ssl_snippet_path(&target.host),
        true,
    )?;
    host.put(templates::SSL_PARAMS, SSL_PARAMS_SNIPPET, true)?;
    configure_nginx(host, target, &nginx.clone().with_ssl())?;
    tracing::info!(host = %target.host, "https enabled");
    Ok(())
}
