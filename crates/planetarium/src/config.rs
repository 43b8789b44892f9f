//! Configuration management for planetarium.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "planetarium";

/// Default upload directory name, under the data directory.
const UPLOAD_DIR_NAME: &str = "uploads";

/// Environment variable prefix.
const ENV_PREFIX: &str = "PLANETARIUM_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PLANETARIUM_`, sections split by `__`)
/// 2. TOML config file at `~/.config/planetarium/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Catalog data configuration.
    pub data: DataConfig,
    /// Image upload configuration.
    pub upload: UploadConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

/// Catalog data sources.
///
/// When a path is unset, the dataset bundled with the binary is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the planets JSON file.
    pub planets_path: Option<PathBuf>,
    /// Path to the satellites JSON file.
    pub satellites_path: Option<PathBuf>,
}

/// Image upload configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory holding uploaded planet images.
    /// Defaults to `~/.local/share/planetarium/uploads`
    pub directory: Option<PathBuf>,
    /// Prefix of the relative paths handed out for stored images.
    pub public_prefix: String,
    /// Maximum accepted upload size in bytes.
    pub max_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: None, // Will be resolved to default at runtime
            public_prefix: UPLOAD_DIR_NAME.to_string(),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration, reading the file at `config_path` or the default
    /// location when no path is given.
    ///
    /// Sections map onto the top-level TOML tables (`[server]`, `[data]`,
    /// `[upload]`) and onto `PLANETARIUM_<SECTION>__<KEY>` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(Error::ConfigValidation {
                message: format!("server.bind is not a socket address: {}", self.server.bind),
            });
        }

        if self.upload.max_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "upload.max_bytes must be greater than 0".to_string(),
            });
        }

        if self.public_prefix().is_empty() {
            return Err(Error::ConfigValidation {
                message: "upload.public_prefix cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("server.bind is not a socket address: {}", self.server.bind),
            })
    }

    /// Get the upload directory, resolving defaults if not set.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.upload
            .directory
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(UPLOAD_DIR_NAME))
    }

    /// Get the public prefix with surrounding slashes removed.
    #[must_use]
    pub fn public_prefix(&self) -> &str {
        self.upload.public_prefix.trim_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert!(config.data.planets_path.is_none());
        assert!(config.data.satellites_path.is_none());
        assert!(config.upload.directory.is_none());
        assert_eq!(config.upload.public_prefix, "uploads");
        assert_eq!(config.upload.max_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_bind() {
        let mut config = Config::default();
        config.server.bind = "not-an-address".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.bind"));
    }

    #[test]
    fn test_validate_zero_max_bytes() {
        let mut config = Config::default();
        config.upload.max_bytes = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_bytes"));
    }

    #[test]
    fn test_validate_empty_public_prefix() {
        let mut config = Config::default();
        config.upload.public_prefix = "//".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("public_prefix"));
    }

    #[test]
    fn test_public_prefix_trims_slashes() {
        let mut config = Config::default();
        config.upload.public_prefix = "/static/uploads/".to_string();

        assert_eq!(config.public_prefix(), "static/uploads");
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_upload_dir_default() {
        let config = Config::default();
        let path = config.upload_dir();

        assert!(path.ends_with("planetarium/uploads"));
    }

    #[test]
    fn test_upload_dir_custom() {
        let mut config = Config::default();
        config.upload.directory = Some(PathBuf::from("/srv/static/uploads"));

        assert_eq!(config.upload_dir(), PathBuf::from("/srv/static/uploads"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("planetarium"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|jail| {
            let missing = jail.directory().join("missing.toml");
            let config = Config::load_from(Some(missing)).map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[server]
bind = "0.0.0.0:8080"

[data]
planets_path = "/srv/data/planets.json"

[upload]
directory = "/srv/uploads"
max_bytes = 1024
"#,
            )?;

            let path = jail.directory().join("config.toml");
            let config = Config::load_from(Some(path)).map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind, "0.0.0.0:8080");
            assert_eq!(
                config.data.planets_path,
                Some(PathBuf::from("/srv/data/planets.json"))
            );
            assert!(config.data.satellites_path.is_none());
            assert_eq!(config.upload_dir(), PathBuf::from("/srv/uploads"));
            assert_eq!(config.upload.max_bytes, 1024);
            assert_eq!(config.upload.public_prefix, "uploads");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[upload]\nmax_bytes = 0\n")?;

            let result = Config::load_from(Some(jail.directory().join("config.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("PLANETARIUM_SERVER__BIND", "0.0.0.0:9000");
            jail.set_env("PLANETARIUM_UPLOAD__PUBLIC_PREFIX", "static/uploads");

            let missing = jail.directory().join("missing.toml");
            let config = Config::load_from(Some(missing)).map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind, "0.0.0.0:9000");
            assert_eq!(config.public_prefix(), "static/uploads");
            assert_eq!(config.upload.max_bytes, 16 * 1024 * 1024);
            Ok(())
        });
    }

    #[test]
    fn test_load_layer_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[server]
bind = "0.0.0.0:8080"

[upload]
max_bytes = 4096
public_prefix = "files"
"#,
            )?;
            jail.set_env("PLANETARIUM_UPLOAD__MAX_BYTES", "2048");

            let path = jail.directory().join("config.toml");
            let config = Config::load_from(Some(path)).map_err(|e| e.to_string())?;
            // env beats file
            assert_eq!(config.upload.max_bytes, 2048);
            // file beats defaults
            assert_eq!(config.server.bind, "0.0.0.0:8080");
            assert_eq!(config.upload.public_prefix, "files");
            // untouched keys keep their defaults
            assert!(config.upload.directory.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_env() {
        Jail::expect_with(|jail| {
            jail.set_env("PLANETARIUM_SERVER__BIND", "nowhere");

            let result = Config::load_from(Some(jail.directory().join("missing.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("public_prefix"));
        assert!(json.contains("bind"));
    }

    #[test]
    fn test_upload_config_deserialize() {
        let json = r#"{"max_bytes": 2048}"#;
        let upload: UploadConfig = serde_json::from_str(json).unwrap();
        assert_eq!(upload.max_bytes, 2048);
        assert_eq!(upload.public_prefix, "uploads");
    }
}
