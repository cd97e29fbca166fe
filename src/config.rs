//! Runtime configuration
//!
//! Values come from the environment (after `.env` is loaded) and can be
//! overridden by command-line flags.

use std::time::Duration;

use crate::error::RenamerError;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Settings for one renaming run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamerConfig {
    /// Messages endpoint (default: https://api.anthropic.com/v1/messages)
    pub api_url: String,

    /// Model to use (default: claude-sonnet-4-5)
    pub model: String,

    /// Response token limit; large directories need long answers
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            request_timeout_secs: 120,
        }
    }
}

impl RenamerConfig {
    /// Read `RENAMER_*` variables from the process environment
    pub fn from_env() -> Result<Self, RenamerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset or blank values keep
    /// their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RenamerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("RENAMER_API_URL") {
            config.api_url = url;
        }
        if let Some(model) = get("RENAMER_MODEL") {
            config.model = model;
        }
        if let Some(raw) = get("RENAMER_MAX_TOKENS") {
            config.max_tokens = parse_number("RENAMER_MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = get("RENAMER_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_number("RENAMER_TIMEOUT_SECS", &raw)?;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, RenamerError> {
    raw.trim()
        .parse()
        .map_err(|_| RenamerError::Config(format!("{} must be a positive number, got {:?}", key, raw)))
}

/// Load `.env` from the working directory, falling back to its parent
pub fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }
}
