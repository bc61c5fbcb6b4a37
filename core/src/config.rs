//! Connection settings read from the environment.

use thiserror::Error;
use url::Url;

pub const BASE_URL_VAR: &str = "NOCODB_BASE_URL";
pub const TOKEN_VAR: &str = "NOCODB_TOKEN";
pub const ADVISORS_TABLE_VAR: &str = "NOCODB_ADVISORS_TABLE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{var} is not a valid url: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
}

/// Where and how to reach the NocoDB instance.
#[derive(Debug, Clone)]
pub struct NocoDbConfig {
    pub base_url: Url,
    pub token: String,
    pub advisors_table: Option<String>,
}

impl NocoDbConfig {
    pub fn new(base_url: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url(base_url)?,
            token: token.to_string(),
            advisors_table: None,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty(BASE_URL_VAR).ok_or(ConfigError::Missing(BASE_URL_VAR))?;
        let token = non_empty(TOKEN_VAR).ok_or(ConfigError::Missing(TOKEN_VAR))?;

        Ok(Self {
            base_url: parse_url(&base_url)?,
            token,
            advisors_table: non_empty(ADVISORS_TABLE_VAR),
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        var: BASE_URL_VAR,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var: BASE_URL_VAR,
            reason: "url cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}
