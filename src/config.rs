//! Optional user configuration, read from `$DEVCTL_CONFIG` or
//! `<config dir>/devctl/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use crate::duration::parse_duration;

pub const CONFIG_ENV: &str = "DEVCTL_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub nw: NwConfig,
    pub kube: KubeConfig,
    pub git: GitConfig,
    pub aws: AwsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NwConfig {
    pub port: u16,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Exit with status 1 when the target is unreachable
    pub fail_on_unreachable: bool,
}

impl Default for NwConfig {
    fn default() -> Self {
        Self {
            port: 80,
            timeout: Duration::from_secs(2),
            fail_on_unreachable: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KubeConfig {
    pub namespace: String,
}

impl Default for KubeConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    pub remote: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AwsConfig {
    pub region: Option<String>,
}

impl Config {
    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("devctl").join("config.toml"))
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw)
        .map_err(|e| serde::de::Error::custom(format!("invalid duration '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.nw.port, 80);
        assert_eq!(config.nw.timeout, Duration::from_secs(2));
        assert!(!config.nw.fail_on_unreachable);
        assert_eq!(config.kube.namespace, "default");
        assert!(config.git.remote.is_none());
        assert!(config.aws.region.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [nw]
            timeout = "500ms"
            fail_on_unreachable = true

            [aws]
            region = "eu-west-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.nw.port, 80);
        assert_eq!(config.nw.timeout, Duration::from_millis(500));
        assert!(config.nw.fail_on_unreachable);
        assert_eq!(config.kube.namespace, "default");
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::parse("[nw]\ntimeout = \"soon\"").is_err());
        assert!(Config::parse("[nw]\nport = 70000").is_err());
        assert!(Config::parse("[unknown]\nkey = 1").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[kube]\nnamespace = \"payments\"\n\n[git]\nremote = \"upstream\""
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.kube.namespace, "payments");
        assert_eq!(config.git.remote.as_deref(), Some("upstream"));
    }

    #[test]
    fn test_load_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.toml"));
    }
}
