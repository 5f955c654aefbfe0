use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::client::DEFAULT_AUTH_PREFIX;
use crate::schedule::RefreshSchedule;

/// Endpoint used when nothing else is configured. Browser builds may override
/// it at compile time through `BIBLIO_API_ENDPOINT`.
pub const DEFAULT_API_ENDPOINT: &str = match option_env!("BIBLIO_API_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "http://localhost:8000",
};

pub const DEFAULT_SESSION_FILE: &str = "biblio-session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_endpoint: String,
    /// Scheme word of the `Authorization` header.
    pub auth_header_prefix: String,
    pub refresh: RefreshConfig,
    /// Where the terminal client keeps its session.
    pub session_file: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            auth_header_prefix: DEFAULT_AUTH_PREFIX.to_string(),
            refresh: RefreshConfig::default(),
            session_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub page_delay_secs: u64,
    pub page_period_secs: u64,
    pub solution_period_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            page_delay_secs: 20,
            page_period_secs: 120,
            solution_period_secs: 5,
        }
    }
}

impl RefreshConfig {
    /// Refreshes every question on the page.
    pub fn page(&self) -> RefreshSchedule {
        RefreshSchedule::new(
            Duration::from_secs(self.page_delay_secs),
            Duration::from_secs(self.page_period_secs),
        )
    }

    /// Refreshes only the expanded question.
    pub fn active_solution(&self) -> RefreshSchedule {
        let period = Duration::from_secs(self.solution_period_secs);
        RefreshSchedule::new(period, period)
    }
}

#[cfg(feature = "native")]
mod native {
    use super::*;
    use crate::types::{AppError, Result};
    use std::env;
    use std::path::{Path, PathBuf};

    pub const DEFAULT_CONFIG_FILE: &str = "biblio.toml";

    impl ClientConfig {
        /// Load `path` if it exists, then apply environment overrides.
        ///
        /// A missing file is not an error: the defaults are used instead.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
            let path = path.as_ref();
            dotenvy::dotenv().ok();

            let mut config = if path.exists() {
                let content = std::fs::read_to_string(path)?;
                Self::from_toml_str(&content)?
            } else {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            };

            config.apply_env_overrides(|key| env::var(key).ok());
            config.validate()?;
            Ok(config)
        }

        pub fn from_toml_str(content: &str) -> Result<Self> {
            toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
        }

        pub fn apply_env_overrides<F>(&mut self, get: F)
        where
            F: Fn(&str) -> Option<String>,
        {
            if let Some(endpoint) = get("BIBLIO_API_ENDPOINT") {
                self.api_endpoint = endpoint;
            }
            if let Some(prefix) = get("BIBLIO_AUTH_PREFIX") {
                self.auth_header_prefix = prefix;
            }
            if let Some(file) = get("BIBLIO_SESSION_FILE") {
                self.session_file = Some(file);
            }
        }

        pub fn validate(&self) -> Result<()> {
            if !(self.api_endpoint.starts_with("http://")
                || self.api_endpoint.starts_with("https://"))
            {
                return Err(AppError::Config(format!(
                    "api_endpoint must be an http(s) URL, got '{}'",
                    self.api_endpoint
                )));
            }
            if self.auth_header_prefix.trim().is_empty() {
                return Err(AppError::Config(
                    "auth_header_prefix cannot be empty".to_string(),
                ));
            }
            let refresh = &self.refresh;
            if refresh.page_period_secs == 0 || refresh.solution_period_secs == 0 {
                return Err(AppError::Config(
                    "refresh periods must be at least one second".to_string(),
                ));
            }
            Ok(())
        }

        pub fn session_path(&self) -> PathBuf {
            PathBuf::from(
                self.session_file
                    .as_deref()
                    .unwrap_or(DEFAULT_SESSION_FILE),
            )
        }
    }
}

#[cfg(feature = "native")]
pub use native::DEFAULT_CONFIG_FILE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.auth_header_prefix, "JWT");
        assert_eq!(config.refresh.page().initial_delay, Duration::from_secs(20));
        assert_eq!(config.refresh.page().period, Duration::from_secs(120));
        assert_eq!(config.refresh.active_solution().period, Duration::from_secs(5));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_partial_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_endpoint = "https://papers.example.edu/api"

            [refresh]
            page_period_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.api_endpoint, "https://papers.example.edu/api");
        assert_eq!(config.refresh.page_period_secs, 60);
        assert_eq!(config.refresh.page_delay_secs, 20);
        assert_eq!(config.auth_header_prefix, "JWT");
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_env_overrides_win() {
        let mut config = ClientConfig::default();
        config.apply_env_overrides(|key| match key {
            "BIBLIO_AUTH_PREFIX" => Some("Bearer".to_string()),
            "BIBLIO_SESSION_FILE" => Some("/tmp/s.json".to_string()),
            _ => None,
        });
        assert_eq!(config.auth_header_prefix, "Bearer");
        assert_eq!(config.session_path(), std::path::PathBuf::from("/tmp/s.json"));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_validation() {
        let mut config = ClientConfig {
            api_endpoint: "ftp://nope".into(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        config.api_endpoint = "http://localhost:8000".into();
        config.refresh.solution_period_secs = 0;
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(dir.path().join("absent.toml"));
        assert!(config.is_ok());
    }
}
