use crate::adapters::openfoodfacts::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::core::{ConfigProvider, MatchMode};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_USERS_PATH: &str = "./users.json";
pub const DEFAULT_USER_AGENT: &str = concat!("barcode-safety/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub lookup: LookupConfig,
    pub matching: MatchingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Require terms to stand alone ("egg" no longer matches "eggplant").
    pub word_boundary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub users_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_path: DEFAULT_USERS_PATH.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl ConfigProvider for AppConfig {
    fn lookup_base_url(&self) -> &str {
        &self.lookup.base_url
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.lookup.user_agent
    }

    fn users_path(&self) -> &str {
        &self.storage.users_path
    }

    fn match_mode(&self) -> MatchMode {
        if self.matching.word_boundary {
            MatchMode::WordBoundary
        } else {
            MatchMode::Substring
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("lookup.base_url", &self.lookup.base_url)?;
        validate_range("lookup.timeout_seconds", self.lookup.timeout_seconds, 1, 120)?;
        if self.lookup.user_agent.trim().is_empty() {
            return Err(AppError::MissingConfigError {
                field: "lookup.user_agent".to_string(),
            });
        }
        validate_path("storage.users_path", &self.storage.users_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.lookup_base_url(), "https://world.openfoodfacts.org");
        assert_eq!(config.lookup_timeout(), Duration::from_secs(10));
        assert_eq!(config.users_path(), "./users.json");
        assert_eq!(config.match_mode(), MatchMode::Substring);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[lookup]
base_url = "http://localhost:8080"
timeout_seconds = 3
user_agent = "scanner-test"

[matching]
word_boundary = true

[storage]
users_path = "/var/lib/scanner/users.json"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.lookup_base_url(), "http://localhost:8080");
        assert_eq!(config.lookup_timeout(), Duration::from_secs(3));
        assert_eq!(config.user_agent(), "scanner-test");
        assert_eq!(config.match_mode(), MatchMode::WordBoundary);
        assert_eq!(config.users_path(), "/var/lib/scanner/users.json");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BARCODE_SAFETY_TEST_USERS", "/tmp/from-env.json");

        let toml_content = r#"
[storage]
users_path = "${BARCODE_SAFETY_TEST_USERS}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.users_path, "/tmp/from-env.json");

        std::env::remove_var("BARCODE_SAFETY_TEST_USERS");
    }

    #[test]
    fn test_unknown_env_var_is_left_verbatim() {
        let toml_content = r#"
[lookup]
base_url = "${BARCODE_SAFETY_SURELY_UNSET}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.lookup.base_url, "${BARCODE_SAFETY_SURELY_UNSET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.lookup.timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.lookup.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.storage.users_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[lookup\nbase_url = 1").unwrap_err();
        assert!(matches!(err, AppError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[matching]\nword_boundary = true\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.match_mode(), MatchMode::WordBoundary);
    }
}
