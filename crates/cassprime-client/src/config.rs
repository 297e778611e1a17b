//! Client configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Connection settings for the stub server's admin API.
///
/// ```yaml
/// admin_url: http://localhost:8043
/// timeout_ms: 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the admin API, without the priming path
    #[serde(default = "default_admin_url")]
    pub admin_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_admin_url() -> String {
    "http://localhost:8043".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            admin_url: default_admin_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given admin URL with the default timeout
    pub fn new(admin_url: impl Into<String>) -> Self {
        Self {
            admin_url: admin_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.admin_url.starts_with("http://") || self.admin_url.starts_with("https://")) {
            anyhow::bail!(
                "admin_url must start with http:// or https:// (got '{}')",
                self.admin_url
            );
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("timeout_ms must be greater than zero");
        }
        Ok(())
    }

    /// Get the admin URL without trailing slashes
    pub fn base_url(&self) -> &str {
        self.admin_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: ClientConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url(), "http://localhost:8043");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
admin_url: http://stub.internal:3456/
timeout_ms: 250
"#;
        let config: ClientConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_url(), "http://stub.internal:3456");
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new("localhost:8043").validate().is_err());

        let config = ClientConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "admin_url: https://stub:8043").unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.admin_url, "https://stub:8043");
        assert_eq!(config.timeout_ms, 10_000);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "admin_url: ftp://stub").unwrap();
        assert!(ClientConfig::from_file(bad.path()).is_err());
    }
}
