//! Configuration types for delicious.
//!
//! [`Config::load`] reads `~/.config/delicious/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies
//! `DELICIOUS__<SECTION>__<KEY>` environment overrides.
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem or the environment (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
host       = "127.0.0.1"
port       = 7777
public_url = "http://localhost:7777"

[uploads]
dir       = "./public/uploads"
max_width = 800

[auth]
reset_token_ttl_secs = 3600
session_ttl_secs     = 1209600

[typeahead]
server_url        = "http://127.0.0.1:7777"
show_descriptions = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/delicious/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub typeahead: TypeaheadConfig,
}

/// `[server]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally visible base URL, used to build password reset links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 7777 }
fn default_public_url() -> String { "http://localhost:7777".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[uploads]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_uploads_dir")]
    pub dir: PathBuf,
    /// Stored photos are resized to at most this many pixels wide.
    #[serde(default = "default_max_width")]
    pub max_width: u32,
}

fn default_uploads_dir() -> PathBuf { PathBuf::from("./public/uploads") }
fn default_max_width() -> u32 { 800 }

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_uploads_dir(),
            max_width: default_max_width(),
        }
    }
}

/// `[auth]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_reset_token_ttl_secs")]
    pub reset_token_ttl_secs: u64,
    /// Idle sessions older than this are forgotten. Two weeks by default.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_reset_token_ttl_secs() -> u64 { 3600 }
fn default_session_ttl_secs() -> u64 { 14 * 24 * 3600 }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            reset_token_ttl_secs: default_reset_token_ttl_secs(),
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

impl AuthConfig {
    pub fn reset_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reset_token_ttl_secs as i64)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs as i64)
    }
}

/// `[typeahead]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeaheadConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_show_descriptions")]
    pub show_descriptions: bool,
}

fn default_server_url() -> String { "http://127.0.0.1:7777".to_string() }
fn default_show_descriptions() -> bool { true }

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            show_descriptions: default_show_descriptions(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/delicious/config.toml`, layered on top of the
    /// built-in defaults and underneath environment overrides. Creates the
    /// file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix("DELICIOUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("delicious")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
