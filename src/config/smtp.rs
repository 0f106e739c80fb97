use crate::domain::catalog::PROFILE;
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

pub const DEFAULT_SMTP_PORT: u16 = 587;

/// 隱式 TLS 連接埠
pub const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    /// Implicit TLS when true, opportunistic STARTTLS otherwise. Derived from
    /// the port when unset.
    pub secure: Option<bool>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SMTP_PORT,
            secure: None,
            username: None,
            password: None,
            from_name: None,
            from_email: None,
        }
    }
}

// 密碼不可出現在日誌中
impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("from_name", &self.from_name)
            .field("from_email", &self.from_email)
            .finish()
    }
}

impl SmtpConfig {
    /// 從環境變數載入 SMTP 設定
    pub fn from_env() -> Result<Self> {
        Self::default().overlay(|key| env::var(key).ok())
    }

    /// Applies `SMTP_*` / `FROM_*` values on top of `self`. Empty values are
    /// treated as unset.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(host) = read("SMTP_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = read("SMTP_PORT") {
            self.port = port
                .parse()
                .map_err(|_| LeadError::InvalidConfigValueError {
                    field: "SMTP_PORT".to_string(),
                    value: port.clone(),
                    reason: "Port must be a number between 1 and 65535".to_string(),
                })?;
        }
        if let Some(secure) = read("SMTP_SECURE") {
            self.secure = Some(parse_flag("SMTP_SECURE", &secure)?);
        }
        if let Some(username) = read("SMTP_USER") {
            self.username = Some(username);
        }
        if let Some(password) = read("SMTP_PASS") {
            self.password = Some(password);
        }
        if let Some(from_name) = read("FROM_NAME") {
            self.from_name = Some(from_name);
        }
        if let Some(from_email) = read("FROM_EMAIL") {
            self.from_email = Some(from_email);
        }

        Ok(self)
    }

    /// Host, username and password are all present.
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.credentials().is_some()
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    pub fn is_secure(&self) -> bool {
        self.secure.unwrap_or(self.port == IMPLICIT_TLS_PORT)
    }

    pub fn sender_name(&self) -> &str {
        self.from_name.as_deref().unwrap_or(PROFILE.name)
    }

    /// Falls back to the login name, which most providers require anyway.
    pub fn sender_address(&self) -> Option<&str> {
        self.from_email.as_deref().or(self.username.as_deref())
    }
}

impl Validate for SmtpConfig {
    fn validate(&self) -> Result<()> {
        validate_range("smtp.port", self.port, 1, u16::MAX)?;
        if let Some(host) = &self.host {
            validate_non_empty_string("smtp.host", host)?;
        }
        Ok(())
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LeadError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected true or false".to_string(),
        }),
    }
}
