use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for the dashboard client, read from `NAVTILES_*` variables and an
/// optional TOML file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base of the storage API, e.g. `http://localhost:8787/api`.
    pub api_base_url: String,
    /// Holds the local color-meaning mirror.
    pub data_dir: PathBuf,
    pub favicon_timeout_secs: u64,
}

#[derive(Deserialize, Default, Debug)]
struct PartialClientConfig {
    api_base_url: Option<String>,
    data_dir: Option<PathBuf>,
    favicon_timeout_secs: Option<u64>,
}

const ENV_PREFIX: &str = "NAVTILES_";

fn default_api_base_url() -> String {
    "http://localhost:8787/api".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_favicon_timeout_secs() -> u64 {
    3
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_dir: default_data_dir(),
            favicon_timeout_secs: default_favicon_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let file_config = read_file_config(config_path)?;
        let env_config: PartialClientConfig = envy::prefixed(ENV_PREFIX)
            .from_env::<PartialClientConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        Ok(Self::merge(env_config, file_config))
    }

    fn merge(env_config: PartialClientConfig, file_config: PartialClientConfig) -> Self {
        let api_base_url = env_config
            .api_base_url
            .or(file_config.api_base_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(default_api_base_url);
        ClientConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            data_dir: env_config.data_dir.or(file_config.data_dir)
                .unwrap_or_else(default_data_dir),
            favicon_timeout_secs: env_config.favicon_timeout_secs.or(file_config.favicon_timeout_secs)
                .unwrap_or_else(default_favicon_timeout_secs),
        }
    }

    pub fn favicon_timeout(&self) -> Duration {
        Duration::from_secs(self.favicon_timeout_secs)
    }
}

fn read_file_config(config_path: Option<&str>) -> Result<PartialClientConfig, String> {
    let Some(path_str) = config_path else {
        return Ok(PartialClientConfig::default());
    };
    let path = Path::new(path_str);
    if !path.exists() {
        return Ok(PartialClientConfig::default());
    }
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
    toml::from_str(&contents)
        .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::merge(PartialClientConfig::default(), PartialClientConfig::default());
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.favicon_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_env_overrides_file_and_trailing_slash_is_trimmed() {
        let env_config = PartialClientConfig {
            api_base_url: Some("https://tiles.example.com/api/".to_string()),
            ..Default::default()
        };
        let file_config = PartialClientConfig {
            api_base_url: Some("http://ignored/api".to_string()),
            favicon_timeout_secs: Some(5),
            ..Default::default()
        };
        let config = ClientConfig::merge(env_config, file_config);
        assert_eq!(config.api_base_url, "https://tiles.example.com/api");
        assert_eq!(config.favicon_timeout_secs, 5);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_read_file_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url = \"http://10.0.0.2:8787/api\"\ndata_dir = \"/tmp/tiles\"").unwrap();

        let partial = read_file_config(file.path().to_str()).unwrap();
        assert_eq!(partial.api_base_url.as_deref(), Some("http://10.0.0.2:8787/api"));
        assert_eq!(partial.data_dir, Some(PathBuf::from("/tmp/tiles")));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let partial = read_file_config(Some("/definitely/not/here.toml")).unwrap();
        assert!(partial.api_base_url.is_none());
    }
}
