//! Runtime configuration.
//!
//! Defaults are defined in code and can be overridden through the
//! environment with the `COMIC_` prefix, `__` separating nested sections
//! (e.g. `COMIC_BASIC__BIND_ADDR`, `COMIC_MEDIA__ROOT`).

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub media: MediaConfig,
    pub admin: AdminSeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Skip the `Secure` cookie attribute; local development only.
    pub insecure_cookie: bool,
    /// Optional directory of JSON issue files loaded when the catalog is empty.
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory backing the media bucket.
    pub root: PathBuf,
    /// URL path prefix uploaded files are served under.
    pub public_prefix: String,
    /// Optional public origin; when set, upload responses carry absolute
    /// URLs instead of site-relative paths.
    pub base_url: Option<url::Url>,
}

/// Seed credentials for the admin table. The password is consumed once at
/// startup (hashed, then only the hash is stored); it is never required
/// after the first run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            basic: BasicConfig::default(),
            media: MediaConfig::default(),
            admin: AdminSeedConfig::default(),
        }
    }
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:comic-press.sqlite?mode=rwc".to_string(),
            loglevel: "info".to_string(),
            insecure_cookie: false,
            seed_path: None,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("media"),
            public_prefix: "/media".to_string(),
            base_url: None,
        }
    }
}

impl Default for AdminSeedConfig {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            password: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("COMIC_").split("__"))
            .extract()
            .unwrap_or_else(|e| {
                eprintln!("invalid configuration, falling back to defaults: {e}");
                Config::default()
            })
    }
}
