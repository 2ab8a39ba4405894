#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_COMPANY_ID: i64 = 1;

/// Client configuration, usually read from a TOML file:
///
/// ```toml
/// [api]
/// base_url = "https://erp.example.com"
/// timeout_seconds = 15
/// token = "${COMPANY_API_TOKEN}"
///
/// [api.headers]
/// X-Tenant = "acme"
///
/// [company]
/// id = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub company: CompanyConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub token: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_company_id")]
    pub id: i64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("headers", &self.headers)
            .finish()
    }
}

fn default_company_id() -> i64 {
    DEFAULT_COMPANY_ID
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_COMPANY_ID,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_seconds: None,
                token: None,
                headers: None,
            },
            company: CompanyConfig::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StoreError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StoreError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for ClientConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn auth_token(&self) -> Option<&str> {
        self.api.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    fn extra_headers(&self) -> Vec<(String, String)> {
        self.api
            .headers
            .as_ref()
            .map(|headers| {
                headers
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn company_id(&self) -> i64 {
        self.company.id
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }

        if self.company.id < 0 {
            return Err(StoreError::InvalidConfigValueError {
                field: "company.id".to_string(),
                value: self.company.id.to_string(),
                reason: "Company id cannot be negative".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
base_url = "https://erp.example.com"
timeout_seconds = 15
token = "abc"

[api.headers]
X-Tenant = "acme"

[company]
id = 7
"#;

        let config = ClientConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.base_url(), "https://erp.example.com");
        assert_eq!(config.timeout_seconds(), 15);
        assert_eq!(config.auth_token(), Some("abc"));
        assert_eq!(
            config.extra_headers(),
            vec![("X-Tenant".to_string(), "acme".to_string())]
        );
        assert_eq!(config.company_id(), 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_are_missing() {
        let config = ClientConfig::from_toml_str("[api]\nbase_url = \"http://localhost:9000\"\n")
            .unwrap();
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.company_id(), DEFAULT_COMPANY_ID);
        assert_eq!(config.auth_token(), None);
        assert!(config.extra_headers().is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("COMPANY_STORE_TEST_TOKEN", "from-env");
        let config = ClientConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost:8080"
token = "${COMPANY_STORE_TEST_TOKEN}"
"#,
        )
        .unwrap();
        assert_eq!(config.auth_token(), Some("from-env"));
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let config = ClientConfig::from_toml_str(
            r#"
[api]
base_url = "http://localhost:8080"
token = "${COMPANY_STORE_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert_eq!(config.auth_token(), Some("${COMPANY_STORE_SURELY_UNSET_VAR}"));
    }

    #[test]
    fn test_debug_output_hides_token() {
        let mut config = ClientConfig::new("https://erp.example.com");
        config.api.token = Some("super-secret-token".to_string());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("https://erp.example.com"));

        config.api.token = None;
        assert!(format!("{:?}", config).contains("token: None"));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = ClientConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, StoreError::ConfigError { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ClientConfig::new("ftp://example.com");
        assert!(config.validate().is_err());

        config.api.base_url = "https://example.com".to_string();
        config.api.timeout_seconds = Some(0);
        assert!(config.validate().is_err());

        config.api.timeout_seconds = Some(5);
        config.company.id = -1;
        assert!(config.validate().is_err());

        config.company.id = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://127.0.0.1:3000\"\n\n[company]\nid = 2").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:3000");
        assert_eq!(config.company_id(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ClientConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, StoreError::IoError(_)));
    }
}
