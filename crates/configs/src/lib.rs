//! # configs
//!
//! Layered settings: serde defaults, then an optional `config/guestbook`
//! file, then `GUESTBOOK__SECTION__KEY` environment variables.

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "GUESTBOOK";
pub const DEFAULT_CONFIG_FILE: &str = "config/guestbook";

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: &[&str] = &["moderation.extra_words", "moderation.allowed_words"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
    pub feed: FeedSettings,
    pub moderation: ModerationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Without a URL the server falls back to the in-memory store.
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: Option<SecretString>,
    pub token_ttl_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive. `RUST_LOG` wins when set.
    pub filter: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub reply_preview_chars: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 100,
            reply_preview_chars: 140,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingPolicyKind {
    #[default]
    Strict,
    ProfanityOnly,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationSettings {
    pub posting_policy: PostingPolicyKind,
    /// Added to the built-in word list.
    pub extra_words: Vec<String>,
    /// Removed from the built-in word list.
    pub allowed_words: Vec<String>,
    pub allow_links: bool,
    pub max_links: usize,
    pub allow_profanity: bool,
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for ModerationSettings {
    fn default() -> Self {
        Self {
            posting_policy: PostingPolicyKind::Strict,
            extra_words: Vec::new(),
            allowed_words: Vec::new(),
            allow_links: false,
            max_links: 0,
            allow_profanity: false,
            min_length: 1,
            max_length: 1000,
        }
    }
}

impl Settings {
    /// Reads `.env` if present, then the default file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let settings: Self = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        settings.validate()
    }

    /// Parses TOML on top of the defaults. No environment lookup.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let feed = &self.feed;
        if feed.default_page_size == 0 || feed.max_page_size == 0 {
            return Err(ConfigError::Invalid("feed page sizes must be positive".into()));
        }
        if feed.default_page_size > feed.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "feed.default_page_size ({}) exceeds feed.max_page_size ({})",
                feed.default_page_size, feed.max_page_size
            )));
        }
        let moderation = &self.moderation;
        if moderation.min_length > moderation.max_length {
            return Err(ConfigError::Invalid(format!(
                "moderation.min_length ({}) exceeds moderation.max_length ({})",
                moderation.min_length, moderation.max_length
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be positive".into()));
        }
        Ok(self)
    }
}

fn environment() -> Environment {
    let env = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .try_parsing(true);
    LIST_KEYS
        .iter()
        .fold(env, |env, key| env.with_list_parse_key(key))
}
