use super::message::{EmailBody, OutgoingEmail};
use crate::config::RelayConfig;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// Outbound mail delivery.
///
/// Handlers only see this trait; the runtime wires in `SmtpMailer` while
/// tests inject recording or failing fakes.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt exactly one delivery. No retries at this layer.
    async fn deliver(&self, email: OutgoingEmail) -> Result<()>;

    /// Transport name for logging
    fn name(&self) -> &str;
}

/// SMTP delivery through the configured relay account.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let credentials = Credentials::new(
            config.smtp_user.clone(),
            config.smtp_app_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("failed to configure SMTP relay {}", config.smtp_host))?
            .credentials(credentials)
            .build();

        let address = config
            .sender_email
            .parse()
            .with_context(|| format!("invalid sender address: {}", config.sender_email))?;
        let sender = Mailbox::new(Some(config.sender_name.clone()), address);

        Ok(Self { transport, sender })
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message> {
        let OutgoingEmail {
            to,
            subject,
            body,
            attachment,
        } = email;

        let to: Mailbox = to
            .parse()
            .with_context(|| format!("invalid recipient address: {to}"))?;

        let builder = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(subject);

        let body_part = match body {
            EmailBody::Text(text) => SinglePart::plain(text),
            EmailBody::Html(html) => SinglePart::html(html),
        };

        let message = match attachment {
            Some(att) => {
                let content_type = ContentType::parse(&att.content_type).with_context(|| {
                    format!("invalid attachment content type: {}", att.content_type)
                })?;
                let att_part = Attachment::new(att.filename).body(att.bytes, content_type);

                builder.multipart(MultiPart::mixed().singlepart(body_part).singlepart(att_part))
            }
            None => builder.singlepart(body_part),
        }
        .context("failed to assemble email")?;

        Ok(message)
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;

        info!("Email sent");

        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}
