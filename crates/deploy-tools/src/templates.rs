//! Bundled config templates
//!
//! Placeholders are upper-case words (`SITENAME`, `USERNAME`) replaced
//! verbatim.

use crate::site::DeployTarget;

const SERVICE: &str = include_str!("../templates/superlists.service.template");
const LETSENCRYPT: &str = include_str!("../templates/letsencrypt.conf.template");
const SSL_SITE: &str = include_str!("../templates/ssl-site.conf.template");
const CERTBOT_CRON: &str = include_str!("../templates/certbot.cron.template");

pub const SSL_PARAMS: &str = include_str!("../templates/ssl-params.conf");

const EMAIL_PLACEHOLDER: &str = "#--EMAIL--#";

fn fill(template: &str, target: &DeployTarget) -> String {
    template
        .replace("SITENAME", &target.host)
        .replace("USERNAME", &target.user)
}

pub fn systemd_unit(target: &DeployTarget) -> String {
    fill(SERVICE, target)
}

/// certbot config; the email line is dropped when none is given
pub fn letsencrypt_config(target: &DeployTarget, email: Option<&str>) -> String {
    let email_line = email.map(|e| format!("email = {e}")).unwrap_or_default();
    fill(LETSENCRYPT, target)
        .lines()
        .filter_map(|line| {
            if line == EMAIL_PLACEHOLDER {
                (!email_line.is_empty()).then(|| email_line.clone())
            } else {
                Some(line.to_string())
            }
        })
        .map(|line| line + "\n")
        .collect()
}

pub fn ssl_site_snippet(target: &DeployTarget) -> String {
    fill(SSL_SITE, target)
}

pub fn certbot_cron(target: &DeployTarget) -> String {
    fill(CERTBOT_CRON, target)
}
