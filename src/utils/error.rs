use crate::domain::schema::FieldViolation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadError {
    #[error("Validation failed: {} field(s) rejected", .details.len())]
    ValidationError { details: Vec<FieldViolation> },

    #[error("Submission rejected by honeypot check")]
    SpamRejected,

    #[error("Rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid mail address: {0}")]
    MailAddressError(#[from] lettre::address::AddressError),

    #[error("Failed to build mail message: {0}")]
    MailBuildError(#[from] lettre::error::Error),

    #[error("Mail transport failed: {0}")]
    MailTransportError(#[from] lettre::transport::smtp::Error),

    #[error("Malformed HTTP request: {message}")]
    HttpError { message: String },

    #[error("Request exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，決定 HTTP 狀態碼與日誌等級
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Spam,
    RateLimit,
    Storage,
    Notify,
    Protocol,
    Config,
}

impl LeadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LeadError::ValidationError { .. } => ErrorCategory::Validation,
            LeadError::SpamRejected => ErrorCategory::Spam,
            LeadError::RateLimited { .. } => ErrorCategory::RateLimit,
            LeadError::IoError(_) | LeadError::SerializationError(_) => ErrorCategory::Storage,
            LeadError::MailAddressError(_)
            | LeadError::MailBuildError(_)
            | LeadError::MailTransportError(_) => ErrorCategory::Notify,
            LeadError::HttpError { .. } | LeadError::PayloadTooLarge { .. } => {
                ErrorCategory::Protocol
            }
            LeadError::ConfigError { .. } | LeadError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
        }
    }

    /// 回傳給使用者的訊息，不洩漏內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            LeadError::ValidationError { .. } => "Validation failed".to_string(),
            LeadError::SpamRejected => "Invalid submission".to_string(),
            LeadError::RateLimited { .. } => {
                "Too many submissions, please try again later.".to_string()
            }
            LeadError::HttpError { message } => format!("Bad request: {}", message),
            LeadError::PayloadTooLarge { .. } => "Request body too large".to_string(),
            LeadError::ConfigError { .. } | LeadError::InvalidConfigValueError { .. } => {
                format!("Invalid configuration: {}", self)
            }
            _ => "Failed to submit lead".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Storage => "Check that the leads file exists and contains a JSON array",
            ErrorCategory::Notify => "Check the SMTP_* environment variables",
            ErrorCategory::Config => "Fix the configuration file or environment and restart",
            _ => "No action required",
        }
    }
}

pub type Result<T> = std::result::Result<T, LeadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_hide_details_from_users() {
        let err = LeadError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "/srv/data/leads.json",
        ));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.user_friendly_message(), "Failed to submit lead");
        assert!(!err.user_friendly_message().contains("leads.json"));
    }

    #[test]
    fn test_spam_and_validation_share_generic_wording() {
        assert_eq!(LeadError::SpamRejected.user_friendly_message(), "Invalid submission");
        let err = LeadError::ValidationError {
            details: vec![FieldViolation::new("email", "Valid email is required")],
        };
        assert_eq!(err.to_string(), "Validation failed: 1 field(s) rejected");
    }
}
