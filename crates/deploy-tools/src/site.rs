//! Deploy target and per-site folder layout

/// Repository the target checks out
pub const REPO_URL: &str = "https://github.com/djangulo/superlists.git";

/// Subfolders created under every site folder
pub const SITE_SUBFOLDERS: [&str; 5] = ["database", "static", "virtualenv", "source", "media"];

/// Where and as whom to deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    pub host: String,
    pub user: String,
    pub ssh_port: u16,
    pub app_port: u16,
    pub repo_url: String,
}

impl DeployTarget {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            ssh_port: 22,
            app_port: 8000,
            repo_url: REPO_URL.to_string(),
        }
    }

    pub fn site(&self) -> SiteLayout {
        SiteLayout {
            root: format!("/home/{}/sites/{}", self.user, self.host),
        }
    }

    pub fn home(&self) -> String {
        format!("/home/{}", self.user)
    }

    pub fn cargo(&self) -> String {
        format!("{}/.cargo/bin/cargo", self.home())
    }

    pub fn service_name(&self) -> String {
        format!("superlists-{}.service", self.host)
    }

    pub fn nginx_available(&self) -> String {
        format!("/etc/nginx/sites-available/{}.nginx.conf", self.host)
    }

    pub fn nginx_enabled(&self) -> String {
        format!("/etc/nginx/sites-enabled/{}.nginx.conf", self.host)
    }
}

/// Paths inside `/home/{user}/sites/{host}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub root: String,
}

impl SiteLayout {
    pub fn folder(&self, name: &str) -> String {
        format!("{}/{}", self.root, name)
    }

    pub fn source(&self) -> String {
        self.folder("source")
    }

    pub fn static_root(&self) -> String {
        self.folder("static")
    }

    pub fn media(&self) -> String {
        self.folder("media")
    }

    pub fn virtualenv(&self) -> String {
        self.folder("virtualenv")
    }

    pub fn database_file(&self) -> String {
        format!("{}/db.sqlite3", self.folder("database"))
    }

    pub fn binary(&self) -> String {
        format!("{}/bin/superlists", self.virtualenv())
    }

    pub fn settings_file(&self) -> String {
        format!("{}/superlists.env", self.source())
    }

    pub fn secret_file(&self) -> String {
        format!("{}/secret_key.env", self.source())
    }
}
