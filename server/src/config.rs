//! Server configuration
//!
//! Loaded once at startup (see `cli`) and shared with handlers via `AppState`.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Hosts accepted in debug mode when none are configured
const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SUPERLISTS_SECRET_KEY must be set when debug is off")]
    MissingSecretKey,
    #[error("SUPERLISTS_ALLOWED_HOSTS must list at least one host when debug is off")]
    NoAllowedHosts,
    #[error("request body limit must be greater than zero")]
    ZeroBodyLimit,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database: PathBuf,
    pub static_root: PathBuf,
    pub debug: bool,
    pub allowed_hosts: Vec<String>,
    pub secret_key: Option<String>,
    pub max_body_bytes: usize,
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database: PathBuf::from("db.sqlite3"),
            static_root: PathBuf::from("static"),
            debug: true,
            allowed_hosts: Vec::new(),
            secret_key: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reject settings the server must not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }
        if self.debug {
            return Ok(());
        }
        if self.secret_key.as_deref().map_or(true, |key| key.trim().is_empty()) {
            return Err(ConfigError::MissingSecretKey);
        }
        if self.allowed_hosts.iter().all(|host| host.trim().is_empty()) {
            return Err(ConfigError::NoAllowedHosts);
        }
        Ok(())
    }

    /// Whether a request addressed to `host` (a Host header value) is served
    ///
    /// `*` matches any host; `.example.com` matches the domain and its
    /// subdomains. With debug on and nothing configured, only local names
    /// are accepted.
    pub fn is_host_allowed(&self, host: &str) -> bool {
        let host = strip_port(host).to_ascii_lowercase();
        if self.debug && self.allowed_hosts.is_empty() {
            return LOCAL_HOSTS.contains(&host.as_str());
        }
        self.allowed_hosts.iter().any(|pattern| {
            let pattern = pattern.trim().to_ascii_lowercase();
            if pattern == "*" {
                return true;
            }
            match pattern.strip_prefix('.') {
                Some(domain) => host == domain || host.ends_with(&pattern),
                None => host == pattern,
            }
        })
    }
}

/// Drop a trailing `:port`, leaving bracketed IPv6 literals intact
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production(hosts: &[&str]) -> ServerConfig {
        ServerConfig {
            debug: false,
            allowed_hosts: hosts.iter().map(|h| h.to_string()).collect(),
            secret_key: Some("s3cr3t".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_debug_defaults_allow_local_hosts() {
        let config = ServerConfig::default();
        assert!(config.is_host_allowed("localhost:8000"));
        assert!(config.is_host_allowed("127.0.0.1"));
        assert!(config.is_host_allowed("[::1]:8000"));
        assert!(!config.is_host_allowed("example.com"));
    }

    #[test]
    fn test_exact_and_wildcard_hosts() {
        let config = production(&["superlists.example.com"]);
        assert!(config.is_host_allowed("superlists.example.com"));
        assert!(config.is_host_allowed("SUPERLISTS.example.com:443"));
        assert!(!config.is_host_allowed("evil.com"));

        assert!(production(&["*"]).is_host_allowed("anything.test"));
    }

    #[test]
    fn test_subdomain_pattern() {
        let config = production(&[".example.com"]);
        assert!(config.is_host_allowed("example.com"));
        assert!(config.is_host_allowed("staging.example.com"));
        assert!(!config.is_host_allowed("badexample.com"));
    }

    #[test]
    fn test_validate() {
        assert_eq!(ServerConfig::default().validate(), Ok(()));
        assert_eq!(production(&["a.test"]).validate(), Ok(()));

        let mut no_secret = production(&["a.test"]);
        no_secret.secret_key = None;
        assert_eq!(no_secret.validate(), Err(ConfigError::MissingSecretKey));

        assert_eq!(production(&[]).validate(), Err(ConfigError::NoAllowedHosts));

        let zero = ServerConfig {
            max_body_bytes: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroBodyLimit));
    }
}
