use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure, stored as `config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Show every directory expanded when a repository loads
    #[serde(default = "default_false")]
    pub expand_folders: bool,

    /// Color scheme
    #[serde(default)]
    pub theme: ThemeChoice,

    /// Leave the terminal's own background showing
    #[serde(default = "default_false")]
    pub transparent: bool,

    /// How long a fetched repository is reused before refetching
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for each API request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Show file type glyphs in front of names
    #[serde(default = "default_true")]
    pub show_icons: bool,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expand_folders: false,
            theme: ThemeChoice::default(),
            transparent: false,
            cache_ttl_hours: default_cache_ttl_hours(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            show_icons: true,
        }
    }
}

/// Requested color scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    /// Dark, or the terminal's own colors when transparent
    #[default]
    Auto,
    Dark,
    Light,
}

impl ThemeChoice {
    /// Parse `dark` or `light` (any case); everything else is `Auto`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => ThemeChoice::Dark,
            "light" => ThemeChoice::Light,
            _ => ThemeChoice::Auto,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_hours == 0 {
            return Err(ConfigError::ValidationError(
                "cache_ttl_hours must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(60 * 60))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Viewer options carried in a query string
///
/// Mirrors the parameters of a shareable viewer link, such as
/// `repo=https://github.com/o/r&expand=true&theme=dark&transparent=true`.
/// A parameter that is absent leaves the configured value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerOptions {
    pub repo: Option<String>,
    pub expand_folders: Option<bool>,
    pub theme: Option<ThemeChoice>,
    pub transparent: Option<bool>,
}

impl ViewerOptions {
    /// Parse a query string
    ///
    /// Accepts a bare query (`repo=...`), one with a leading `?`, or a full
    /// link whose query component is used. A `?` inside a value is kept, so
    /// `repo=https://github.com/o/r?tab=readme` names that link. Flags are
    /// true only for the exact value `true`; `theme` other than
    /// `dark`/`light` means auto.
    pub fn from_query(query: &str) -> Self {
        let trimmed = query.trim();
        let query = match trimmed.strip_prefix('?') {
            Some(rest) => rest.to_string(),
            None => match url::Url::parse(trimmed) {
                Ok(link) => link.query().unwrap_or_default().to_string(),
                Err(_) => trimmed.to_string(),
            },
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut options = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "repo" => options.repo = Some(value.into_owned()),
                "expand" => options.expand_folders = Some(value == "true"),
                "theme" => options.theme = Some(ThemeChoice::parse(&value)),
                "transparent" => options.transparent = Some(value == "true"),
                other => tracing::debug!("Ignoring unknown query parameter {:?}", other),
            }
        }
        options
    }

    /// Override config values with the ones present here
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(expand) = self.expand_folders {
            config.expand_folders = expand;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(transparent) = self.transparent {
            config.transparent = transparent;
        }
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
