use crate::config::smtp::SmtpConfig;
use crate::utils::error::{LeadError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// 設定檔結構，每個區段都可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
    pub leads_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitSection {
    pub max_requests: Option<u32>,
    pub window_seconds: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| LeadError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| LeadError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SMTP_PASS})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
bind = "127.0.0.1:8080"
leads_file = "/var/lib/folio/leads.json"

[rate_limit]
max_requests = 5
window_seconds = 30

[smtp]
host = "smtp.example.com"
port = 465
username = "mailer@example.com"
password = "secret"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.bind.as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(config.rate_limit.max_requests, Some(5));
        assert_eq!(config.rate_limit.window_seconds, Some(30));

        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.port, 465);
        assert!(smtp.is_configured());
        assert!(smtp.is_secure());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.server.bind.is_none());
        assert!(config.rate_limit.max_requests.is_none());
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FOLIO_TEST_SMTP_PASS", "from-env");

        let toml_content = r#"
[smtp]
host = "smtp.example.com"
password = "${FOLIO_TEST_SMTP_PASS}"
username = "${FOLIO_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.password.as_deref(), Some("from-env"));
        assert_eq!(smtp.username.as_deref(), Some("${FOLIO_TEST_UNSET_VAR}"));

        std::env::remove_var("FOLIO_TEST_SMTP_PASS");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[server\nbind = ").unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));

        let err = TomlConfig::from_toml_str("[rate_limit]\nmax_requests = \"many\"").unwrap_err();
        assert!(matches!(err, LeadError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nleads_file = \"leads.json\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.leads_file.as_deref(), Some("leads.json"));

        assert!(TomlConfig::from_file("/nonexistent/folio.toml").is_err());
    }
}
