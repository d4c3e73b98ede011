use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// `postgres://…` or `sqlite://…`. Without it the server keeps tiles in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    listen_addr: Option<String>,
    database_url: Option<String>,
    max_connections: Option<u32>,
    log_dir: Option<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8787".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            database_url: None,
            max_connections: default_max_connections(),
            log_dir: default_log_dir(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config = read_file_config(config_path)?;

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        // 3. Merge: environment overrides file
        Ok(Self::merge(env_config, file_config))
    }

    fn merge(env_config: PartialServerConfig, file_config: PartialServerConfig) -> Self {
        ServerConfig {
            listen_addr: env_config.listen_addr.or(file_config.listen_addr)
                .unwrap_or_else(default_listen_addr),
            database_url: env_config.database_url.or(file_config.database_url)
                .filter(|url| !url.trim().is_empty()),
            max_connections: env_config.max_connections.or(file_config.max_connections)
                .unwrap_or_else(default_max_connections),
            log_dir: env_config.log_dir.or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
        }
    }
}

fn read_file_config(config_path: Option<&str>) -> Result<PartialServerConfig, String> {
    let Some(path_str) = config_path else {
        return Ok(PartialServerConfig::default());
    };
    let path = Path::new(path_str);
    if !path.exists() {
        return Ok(PartialServerConfig::default());
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
    fn test_env_overrides_file() {
        let env_config = PartialServerConfig {
            listen_addr: Some("127.0.0.1:9000".to_string()),
            ..Default::default()
        };
        let file_config = PartialServerConfig {
            listen_addr: Some("0.0.0.0:1".to_string()),
            log_dir: Some("/var/log/navtiles".to_string()),
            ..Default::default()
        };

        let config = ServerConfig::merge(env_config, file_config);
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.log_dir, "/var/log/navtiles");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_blank_database_url_means_memory_store() {
        let env_config = PartialServerConfig {
            database_url: Some("  ".to_string()),
            ..Default::default()
        };
        let config = ServerConfig::merge(env_config, PartialServerConfig::default());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr = \"127.0.0.1:8080\"\ndatabase_url = \"sqlite://tiles.db?mode=rwc\"").unwrap();

        let partial = read_file_config(file.path().to_str()).unwrap();
        assert_eq!(partial.listen_addr.as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(partial.database_url.as_deref(), Some("sqlite://tiles.db?mode=rwc"));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let partial = read_file_config(Some("/definitely/not/here.toml")).unwrap();
        assert!(partial.listen_addr.is_none());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr = ").unwrap();
        let err = read_file_config(file.path().to_str()).unwrap_err();
        assert!(err.contains("Failed to parse TOML"));
    }
}
