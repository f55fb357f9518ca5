use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the current directory.
pub const CONFIG_FILE: &str = ".gh-profile-stats.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .gh-profile-stats.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    /// Fan-out and truncation caps
    #[serde(default)]
    pub limits: Limits,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST API root, without a trailing slash
    pub base_url: String,
    pub user_agent: String,
    /// Deadline for each per-repository request; 0 disables it
    pub aux_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            user_agent: "gh-profile-stats".to_string(),
            aux_timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    pub fn aux_timeout(&self) -> Option<Duration> {
        (self.aux_timeout_secs > 0).then(|| Duration::from_secs(self.aux_timeout_secs))
    }
}

/// Caps on how much data one query pulls.
///
/// These keep an unauthenticated query inside GitHub's hourly quota:
/// 2 + language_repos + commit_repos requests per user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Repositories requested in the single repo-list page
    pub repos_per_page: usize,
    /// Repositories whose language bytes are fetched
    pub language_repos: usize,
    /// Languages kept in the distribution
    pub top_languages: usize,
    /// Repositories whose recent commits are fetched
    pub commit_repos: usize,
    pub commits_per_repo: usize,
    /// Only count commits authored by the queried user
    pub own_commits_only: bool,
    /// Non-fork repositories listed in the summary
    pub top_repos: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            repos_per_page: 100,
            language_repos: 10,
            top_languages: 8,
            commit_repos: 5,
            commits_per_repo: 30,
            own_commits_only: false,
            top_repos: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub hour_zone: HourZone,
}

/// Clock used to place commit timestamps into hour buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourZone {
    #[default]
    Local,
    Utc,
}

impl Config {
    /// Load configuration from .gh-profile-stats.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };
        Ok(config.with_env_overrides())
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply GITHUB_API_URL, if set, over the configured base URL.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        self
    }
}
