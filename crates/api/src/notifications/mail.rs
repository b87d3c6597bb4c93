//! Account mail delivery via SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport to send plain-text
//! activation and reset-password mails. Configuration is loaded from
//! environment variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`]
//! returns `None` and [`LogMailer`] should be used instead.

use async_trait::async_trait;
use timekeeper_core::accounts::Mailer;
use timekeeper_core::error::{CoreError, CoreResult};
use timekeeper_core::models::User;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

impl From<EmailError> for CoreError {
    fn from(e: EmailError) -> Self {
        CoreError::Internal(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@timekeeper.local";

/// Default front-end address used to build the links in mails.
const DEFAULT_APP_URL: &str = "http://localhost:5173";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// Base URL of the front end the activation and reset links point at.
    pub app_url: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      | -                          |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@timekeeper.local` |
    /// | `SMTP_USER`     | no       | -                          |
    /// | `SMTP_PASSWORD` | no       | -                          |
    /// | `APP_URL`       | no       | `http://localhost:5173`    |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            app_url: std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Subject and plain-text body of an account mail.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountMail {
    pub subject: String,
    pub body: String,
}

pub fn activation_mail(user: &User, app_url: &str) -> CoreResult<AccountMail> {
    let token = user
        .activation_token
        .as_deref()
        .ok_or_else(|| CoreError::Internal(format!("User {} has no activation token", user.id)))?;
    Ok(AccountMail {
        subject: "[Timekeeper] Activate your account".to_string(),
        body: format!(
            "Hello {name},\n\nActivate your account at:\n{app_url}/activate?name={name}&token={token}\n",
            name = user.name
        ),
    })
}

pub fn reset_password_mail(user: &User, app_url: &str) -> CoreResult<AccountMail> {
    let token = user
        .reset_password_token
        .as_deref()
        .ok_or_else(|| CoreError::Internal(format!("User {} has no reset token", user.id)))?;
    Ok(AccountMail {
        subject: "[Timekeeper] Reset your password".to_string(),
        body: format!(
            "Hello {name},\n\nChoose a new password at:\n{app_url}/reset-password?name={name}&token={token}\n\nThe link expires shortly.\n",
            name = user.name
        ),
    })
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends account mails via SMTP.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    async fn deliver(&self, to_email: &str, mail: AccountMail) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(email).await?;
        tracing::info!(to = to_email, "Account mail sent");
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_activation_mail(&self, user: &User) -> CoreResult<()> {
        let mail = activation_mail(user, &self.config.app_url)?;
        Ok(self.deliver(&user.email, mail).await?)
    }

    async fn send_reset_password_mail(&self, user: &User) -> CoreResult<()> {
        let mail = reset_password_mail(user, &self.config.app_url)?;
        Ok(self.deliver(&user.email, mail).await?)
    }
}

// ---------------------------------------------------------------------------
// LogMailer
// ---------------------------------------------------------------------------

/// Writes account mails to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    app_url: String,
}

impl LogMailer {
    pub fn new(app_url: impl Into<String>) -> Self {
        Self {
            app_url: app_url.into(),
        }
    }
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new(DEFAULT_APP_URL)
    }
}

/// The body carries account tokens, so it only shows at `trace`.
fn log_mail(to: &str, mail: &AccountMail) {
    tracing::info!(to, subject = %mail.subject, "SMTP not configured; mail not sent");
    tracing::trace!(to, body = %mail.body, "Unsent mail body");
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_activation_mail(&self, user: &User) -> CoreResult<()> {
        let mail = activation_mail(user, &self.app_url)?;
        log_mail(&user.email, &mail);
        Ok(())
    }

    async fn send_reset_password_mail(&self, user: &User) -> CoreResult<()> {
        let mail = reset_password_mail(user, &self.app_url)?;
        log_mail(&user.email, &mail);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "jane".into(),
            email: "jane@example.com".into(),
            password: "hash".into(),
            active: false,
            activation_token: Some("abc".into()),
            reset_password_token: None,
            reset_time: None,
            token: None,
            selected_task: None,
            selected_project: None,
        }
    }

    #[test]
    fn test_activation_mail_carries_token() {
        let mail = activation_mail(&user(), "https://app.example.com").unwrap();
        assert!(mail.body.contains("https://app.example.com/activate?name=jane&token=abc"));
    }

    #[test]
    fn test_reset_mail_requires_token() {
        assert!(reset_password_mail(&user(), DEFAULT_APP_URL).is_err());

        let mut user = user();
        user.reset_password_token = Some("xyz".into());
        let mail = reset_password_mail(&user, DEFAULT_APP_URL).unwrap();
        assert!(mail.body.contains("token=xyz"));
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_logged_mail_keeps_token_out_of_info_logs() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mail = activation_mail(&user(), DEFAULT_APP_URL).unwrap();
        tracing::subscriber::with_default(subscriber, || log_mail("jane@example.com", &mail));

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("jane@example.com"));
        assert!(output.contains("Activate your account"));
        assert!(!output.contains("token=abc"));
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_mail() {
        LogMailer::default().send_activation_mail(&user()).await.unwrap();
    }
}
