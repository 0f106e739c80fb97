use crate::config::smtp::SmtpConfig;
use crate::core::Notifier;
use crate::domain::catalog::PROFILE;
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use maud::{html, Markup};
use std::sync::Arc;

pub fn confirmation_subject() -> String {
    format!("Thanks — {} will reach out soon", PROFILE.name)
}

pub fn plain_body(name: &str) -> String {
    format!(
        "Hi {name},\n\n\
         Thanks for reaching out. {owner} will get back to you soon to discuss your \
         Salesforce needs.\n\n\
         In the meantime, feel free to check out the services and pricing on the website.\n\n\
         Best regards,\n{owner}\n{role}\n",
        name = name,
        owner = PROFILE.name,
        role = PROFILE.role,
    )
}

pub fn html_body(name: &str) -> Markup {
    html! {
        div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;" {
            h2 style="color: #6366F1;" { "Thanks for reaching out!" }
            p { "Hi " (name) "," }
            p {
                "✅ Thanks for reaching out. " (PROFILE.name)
                " will get back to you soon to discuss your Salesforce needs."
            }
            p { "In the meantime, feel free to check out the services and pricing on the website." }
            br;
            p {
                "Best regards," br;
                strong { (PROFILE.name) } br;
                (PROFILE.role)
            }
        }
    }
}

/// Used when SMTP is not configured: records the intended send and succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, _email: &str, _name: &str) -> Result<()> {
        tracing::info!("📭 SMTP not configured, skipping confirmation email");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "log"
    }
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let host = config.host.as_deref().ok_or_else(|| LeadError::ConfigError {
            message: "SMTP host is not set".to_string(),
        })?;
        let (username, password) = config.credentials().ok_or_else(|| LeadError::ConfigError {
            message: "SMTP credentials are not set".to_string(),
        })?;

        let tls_parameters = TlsParameters::new(host.to_string())?;
        let tls = if config.is_secure() {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        let address: Address = config.sender_address().unwrap_or(username).parse()?;
        let from = Mailbox::new(Some(config.sender_name().to_string()), address);

        Ok(Self { transport, from })
    }

    pub fn compose(&self, email: &str, name: &str) -> Result<Message> {
        let to = Mailbox::new(Some(name.to_string()), email.parse()?);
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(confirmation_subject())
            .multipart(MultiPart::alternative_plain_html(
                plain_body(name),
                html_body(name).into_string(),
            ))?;
        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, email: &str, name: &str) -> Result<()> {
        let message = self.compose(email, name)?;
        self.transport.send(message).await?;
        tracing::debug!("✉️ Confirmation email accepted by the SMTP relay");
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "smtp"
    }
}

/// Picks SMTP when host and credentials are present. Any problem building
/// the transport degrades to [`LogNotifier`] instead of failing startup.
pub fn build_notifier(config: &SmtpConfig) -> Arc<dyn Notifier> {
    if !config.is_configured() {
        tracing::warn!("SMTP_HOST/SMTP_USER/SMTP_PASS not set, confirmation emails will only be logged");
        return Arc::new(LogNotifier);
    }

    match SmtpNotifier::from_config(config) {
        Ok(notifier) => {
            tracing::info!(
                "📮 SMTP notifier ready ({}:{}, {})",
                config.host.as_deref().unwrap_or_default(),
                config.port,
                if config.is_secure() { "tls" } else { "starttls" }
            );
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::error!("❌ Could not set up SMTP notifier: {}", e);
            Arc::new(LogNotifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;

    fn configured() -> SmtpConfig {
        SmtpConfig {
            host: Some("smtp.example.com".to_string()),
            username: Some("mailer@example.com".to_string()),
            password: Some("secret".to_string()),
            ..SmtpConfig::default()
        }
    }

    #[test]
    fn test_unconfigured_falls_back_to_log() {
        let notifier = build_notifier(&SmtpConfig::default());
        assert_eq!(notifier.kind(), "log");
    }

    #[test]
    fn test_configured_builds_smtp() {
        let notifier = build_notifier(&configured());
        assert_eq!(notifier.kind(), "smtp");
    }

    #[test]
    fn test_bad_sender_address_falls_back_to_log() {
        let config = SmtpConfig {
            from_email: Some("not an address".to_string()),
            ..configured()
        };
        assert!(SmtpNotifier::from_config(&config).is_err());
        assert_eq!(build_notifier(&config).kind(), "log");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds_without_logging_recipient() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        assert!(LogNotifier
            .notify("secret.client@example.com", "Secret Client")
            .await
            .is_ok());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("SMTP not configured"));
        assert!(!output.contains("secret.client@example.com"));
        assert!(!output.contains("Secret Client"));
    }

    #[test]
    fn test_compose_addresses_recipient() {
        let notifier = SmtpNotifier::from_config(&configured()).unwrap();
        let message = notifier.compose("client@example.com", "Client").unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("client@example.com"));
        assert!(raw.contains("mailer@example.com"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_compose_rejects_bad_recipient() {
        let notifier = SmtpNotifier::from_config(&configured()).unwrap();
        let err = notifier.compose("nope", "Client").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Notify);
    }

    #[test]
    fn test_bodies_are_personalized_and_escaped() {
        assert!(plain_body("Grace").starts_with("Hi Grace,"));

        let html = html_body("<b>Eve</b>").into_string();
        assert!(html.contains("Hi &lt;b&gt;Eve&lt;/b&gt;,"));
        assert!(html.contains(PROFILE.name));
        assert!(confirmation_subject().contains(PROFILE.name));
    }
}
