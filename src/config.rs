use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

pub const BASE_URL_ENV: &str = "WIKI_QUIZ_BASE_URL";

const DEFAULT_REMOTE_URL: &str = "https://ai-wiki-quiz-generator-j8j0.onrender.com";
const DEFAULT_LOCAL_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_local_base_url")]
    pub local_base_url: String,

    /// Talk to `local_base_url` instead of `base_url`.
    #[serde(default)]
    pub use_local: bool,

    /// Quiz generation runs a scrape plus an LLM call on the service side.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_local_base_url() -> String {
    DEFAULT_LOCAL_URL.to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            local_base_url: default_local_base_url(),
            use_local: false,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads the config at `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wiki-quiz")
            .join("config.toml")
    }

    /// Resolves the service endpoint. An explicit `WIKI_QUIZ_BASE_URL` wins over
    /// the config file; `force_local` comes from the `--local` flag.
    pub fn resolve_base_url(&self, force_local: bool) -> Result<Url> {
        let env_override = std::env::var(BASE_URL_ENV).ok();
        self.select_base_url(env_override.as_deref(), force_local)
    }

    fn select_base_url(&self, env_override: Option<&str>, force_local: bool) -> Result<Url> {
        let raw = match env_override.map(str::trim).filter(|s| !s.is_empty()) {
            Some(url) => url,
            None if force_local || self.use_local => self.local_base_url.as_str(),
            None => self.base_url.as_str(),
        };

        let url = Url::parse(raw).map_err(|e| AppError::InvalidUrl(format!("{raw}: {e}")))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::InvalidUrl(format!("{raw}: not an http(s) base URL")));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_remote_service() {
        let config = Config::default();
        let url = config.select_base_url(None, false).unwrap();
        assert_eq!(url.as_str(), "https://ai-wiki-quiz-generator-j8j0.onrender.com/");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_local_selection() {
        let config = Config::default();
        let url = config.select_base_url(None, true).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/");

        let config = Config {
            use_local: true,
            ..Config::default()
        };
        let url = config.select_base_url(None, false).unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
    }

    #[test]
    fn test_env_override_wins() {
        let config = Config::default();
        let url = config
            .select_base_url(Some("http://quiz.internal:9000"), true)
            .unwrap();
        assert_eq!(url.as_str(), "http://quiz.internal:9000/");

        // Blank override is ignored
        let url = config.select_base_url(Some("  "), false).unwrap();
        assert_eq!(url.host_str(), Some("ai-wiki-quiz-generator-j8j0.onrender.com"));
    }

    #[test]
    fn test_rejects_non_http_base() {
        let config = Config {
            base_url: "mailto:someone@example.com".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.select_base_url(None, false),
            Err(AppError::InvalidUrl(_))
        ));

        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.select_base_url(None, false).is_err());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "use_local = true\nrequest_timeout_secs = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.use_local);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.base_url, DEFAULT_REMOTE_URL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "use_local = \"maybe").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(AppError::ConfigParse(_))
        ));
    }
}
