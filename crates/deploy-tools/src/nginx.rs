//! Reverse-proxy configuration
//!
//! Renders the nginx site config for a target and installs it into
//! `sites-available`, linking it into `sites-enabled` on first install.

use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::remote::RemoteHost;
use crate::shell::quote;
use crate::site::DeployTarget;

pub const ACME_LOCATION: &str = "/.well-known/acme-challenge";
pub const ACME_ROOT: &str = "/var/www/letsencrypt";

/// Switches for the rendered server blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NginxOptions {
    pub default_server: bool,
    pub ssl: bool,
    pub ssl_redirect: bool,
    pub static_alias: bool,
    pub media_alias: bool,
    pub client_max_body_size: Option<String>,
    pub acme: bool,
}

impl Default for NginxOptions {
    fn default() -> Self {
        Self {
            default_server: false,
            ssl: false,
            ssl_redirect: false,
            static_alias: true,
            media_alias: true,
            client_max_body_size: None,
            acme: false,
        }
    }
}

impl NginxOptions {
    /// Options once a certificate is installed
    pub fn with_ssl(mut self) -> Self {
        self.ssl = true;
        self.ssl_redirect = true;
        self.acme = true;
        self
    }
}

pub fn ssl_snippet_path(host: &str) -> String {
    format!("/etc/nginx/snippets/ssl-{host}.conf")
}

pub const SSL_PARAMS_SNIPPET: &str = "/etc/nginx/snippets/ssl-params.conf";

/// Render the site config for `target`
pub fn render(target: &DeployTarget, options: &NginxOptions) -> String {
    let default = if options.default_server {
        " default_server"
    } else {
        ""
    };
    let mut out = String::new();

    let _ = writeln!(out, "server {{");
    let _ = writeln!(out, "    listen 80{default};");
    let _ = writeln!(out, "    listen [::]:80{default};");
    write_common(&mut out, target, options);
    if options.acme {
        let _ = writeln!(out, "\n    location {ACME_LOCATION} {{");
        let _ = writeln!(out, "        root {ACME_ROOT};");
        let _ = writeln!(out, "    }}");
    }
    if options.ssl_redirect {
        let _ = writeln!(out, "\n    location / {{");
        let _ = writeln!(out, "        return 301 https://$server_name$request_uri;");
        let _ = writeln!(out, "    }}");
    } else {
        write_app_locations(&mut out, target, options);
    }
    let _ = writeln!(out, "}}");

    if options.ssl {
        let _ = writeln!(out, "\nserver {{");
        let _ = writeln!(out, "    listen 443 ssl http2{default};");
        let _ = writeln!(out, "    listen [::]:443 ssl http2{default};");
        write_common(&mut out, target, options);
        let _ = writeln!(out, "    include {};", ssl_snippet_path(&target.host));
        let _ = writeln!(out, "    include {SSL_PARAMS_SNIPPET};");
        write_app_locations(&mut out, target, options);
        let _ = writeln!(out, "}}");
    }
    out
}

fn write_common(out: &mut String, target: &DeployTarget, options: &NginxOptions) {
    let _ = writeln!(out, "    server_name {};", target.host);
    if let Some(size) = &options.client_max_body_size {
        let _ = writeln!(out, "    client_max_body_size {size};");
    }
}

fn write_app_locations(out: &mut String, target: &DeployTarget, options: &NginxOptions) {
    let site = target.site();
    if options.static_alias {
        let _ = writeln!(out, "\n    location /static {{");
        let _ = writeln!(out, "        alias {};", site.static_root());
        let _ = writeln!(out, "    }}");
    }
    if options.media_alias {
        let _ = writeln!(out, "\n    location /media {{");
        let _ = writeln!(out, "        alias {};", site.media());
        let _ = writeln!(out, "    }}");
    }
    let _ = writeln!(out, "\n    location / {{");
    let _ = writeln!(out, "        proxy_pass http://127.0.0.1:{};", target.app_port);
    let _ = writeln!(out, "        proxy_set_header Host $host;");
    let _ = writeln!(out, "        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;");
    let _ = writeln!(out, "        proxy_set_header X-Forwarded-Proto $scheme;");
    let _ = writeln!(out, "    }}");
}

/// Upload the config, link it if needed, then test and reload nginx
pub fn configure_nginx(
    host: &mut dyn RemoteHost,
    target: &DeployTarget,
    options: &NginxOptions,
) -> Result<()> {
    let available = target.nginx_available();
    let enabled = target.nginx_enabled();

    host.put(&render(target, options), &available, true)
        .context("uploading nginx config")?;
    if !host.exists(&enabled)? {
        host.sudo(&format!("ln -s {} {}", quote(&available), quote(&enabled)))?;
    }
    host.sudo("nginx -t").context("nginx rejected the config")?;
    host.sudo("nginx -s reload")?;
    tracing::info!(config = %available, "nginx configured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Recorded, RecordingHost};

    fn target() -> DeployTarget {
        DeployTarget::new("superlists.example.com", "deploy")
    }

    #[test]
    fn test_render_plain_http() {
        let config = render(&target(), &NginxOptions::default());

        assert!(config.contains("listen 80;"));
        assert!(config.contains("server_name superlists.example.com;"));
        assert!(config.contains("alias /home/deploy/sites/superlists.example.com/static;"));
        assert!(config.contains("alias /home/deploy/sites/superlists.example.com/media;"));
        assert!(config.contains("proxy_pass http://127.0.0.1:8000;"));
        assert!(!config.contains("443"));
        assert!(!config.contains("return 301"));
        assert!(!config.contains(ACME_LOCATION));
        assert!(!config.contains("client_max_body_size"));
    }

    #[test]
    fn test_render_default_server() {
        let options = NginxOptions {
            default_server: true,
            ..Default::default()
        };
        assert!(render(&target(), &options).contains("listen 80 default_server;"));
    }

    #[test]
    fn test_render_without_aliases() {
        let options = NginxOptions {
            static_alias: false,
            media_alias: false,
            ..Default::default()
        };
        let config = render(&target(), &options);
        assert!(!config.contains("location /static"));
        assert!(!config.contains("location /media"));
    }

    #[test]
    fn test_render_body_size_and_acme() {
        let options = NginxOptions {
            client_max_body_size: Some("10M".to_string()),
            acme: true,
            ..Default::default()
        };
        let config = render(&target(), &options);
        assert!(config.contains("client_max_body_size 10M;"));
        assert!(config.contains("location /.well-known/acme-challenge {"));
        assert!(config.contains("root /var/www/letsencrypt;"));
    }

    #[test]
    fn test_render_ssl_with_redirect() {
        let config = render(&target(), &NginxOptions::default().with_ssl());

        assert!(config.contains("return 301 https://$server_name$request_uri;"));
        assert!(config.contains("listen 443 ssl http2;"));
        assert!(config.contains("include /etc/nginx/snippets/ssl-superlists.example.com.conf;"));
        assert!(config.contains("include /etc/nginx/snippets/ssl-params.conf;"));
        // the app is only proxied from the https block
        assert_eq!(config.matches("proxy_pass").count(), 1);
        let https = config.find("listen 443").unwrap();
        assert!(config.find("proxy_pass").unwrap() > https);
    }

    #[test]
    fn test_configure_links_only_when_missing() {
        let t = target();
        let mut fresh = RecordingHost::default();
        configure_nginx(&mut fresh, &t, &NginxOptions::default()).unwrap();
        assert!(fresh.commands().iter().any(|c| c.starts_with("ln -s")));
        assert!(fresh.uploaded(&t.nginx_available()).is_some());
        assert_eq!(fresh.commands().last(), Some(&"nginx -s reload"));

        let mut linked = RecordingHost::with_existing([t.nginx_enabled()]);
        configure_nginx(&mut linked, &t, &NginxOptions::default()).unwrap();
        assert!(!linked.commands().iter().any(|c| c.starts_with("ln -s")));
        assert!(linked
            .log
            .iter()
            .any(|e| matches!(e, Recorded::Put { sudo: true, .. })));
    }

    #[test]
    fn test_configure_stops_when_config_test_fails() {
        let mut host = RecordingHost {
            fail_on: Some("nginx -t".to_string()),
            ..Default::default()
        };
        assert!(configure_nginx(&mut host, &target(), &NginxOptions::default()).is_err());
        assert!(!host.commands().contains(&"nginx -s reload"));
    }
}
