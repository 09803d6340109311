//! SMTP delivery for composed emails.
//!
//! The `Mailer` trait is the seam between the inquiry pipeline and the
//! transport, so tests can substitute a fake. The real implementation rides
//! lettre's async SMTP transport with STARTTLS/TLS relay configuration.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::email::ComposedEmail;
use crate::errors::AppError;

/// Provider acknowledgement for one delivered message.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailReceipt {
    pub message_id: String,
}

/// Abstraction over an email transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email` to `to`, optionally setting a Reply-To address.
    /// No internal retries; retry policy belongs to the caller.
    async fn send(
        &self,
        email: &ComposedEmail,
        to: &str,
        reply_to: Option<&str>,
    ) -> Result<EmailReceipt, AppError>;
}

/// Mailer backed by a reusable lettre SMTP transport (connection-pooled,
/// safe for concurrent use).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    /// Build the transport from configuration. Missing credentials are a
    /// construction-time failure, not a send-time one.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        if config.smtp_email.trim().is_empty() || config.smtp_app_password.trim().is_empty() {
            return Err(AppError::Config(
                "SMTP credentials not configured. Set SMTP_EMAIL and SMTP_APP_PASSWORD"
                    .to_string(),
            ));
        }

        let sender: Mailbox = config
            .smtp_email
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid SMTP_EMAIL address: {}", e)))?;

        let credentials = Credentials::new(
            config.smtp_email.clone(),
            config.smtp_app_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay)
            .map_err(|e| AppError::Config(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(credentials)
            .build();

        Ok(Self { transport, sender })
    }

    /// RFC 5322 Message-ID for outgoing mail, unique per process and instant.
    fn next_message_id(&self) -> String {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let domain = self
            .sender
            .email
            .domain()
            .to_string();
        format!(
            "<{}.{}.{}@{}>",
            chrono::Utc::now().timestamp_micros(),
            std::process::id(),
            seq,
            domain
        )
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        email: &ComposedEmail,
        to: &str,
        reply_to: Option<&str>,
    ) -> Result<EmailReceipt, AppError> {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| AppError::EmailDelivery(format!("Invalid recipient '{}': {}", to, e)))?;

        let message_id = self.next_message_id();

        let mut builder = Message::builder()
            .from(self.sender.clone())
            .to(to_mailbox)
            .subject(email.subject.clone())
            .message_id(Some(message_id.clone()));

        if let Some(addr) = reply_to {
            let reply_mailbox: Mailbox = addr.parse().map_err(|e| {
                AppError::EmailDelivery(format!("Invalid reply-to '{}': {}", addr, e))
            })?;
            builder = builder.reply_to(reply_mailbox);
        }

        let message = builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html.clone()),
                    ),
            )
            .map_err(|e| AppError::EmailDelivery(format!("Failed to build email: {}", e)))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| AppError::EmailDelivery(format!("SMTP send failed: {}", e)))?;

        tracing::debug!(
            "SMTP accepted message {}: {}",
            message_id,
            response.message().collect::<Vec<_>>().join(" ")
        );

        Ok(EmailReceipt { message_id })
    }
}
