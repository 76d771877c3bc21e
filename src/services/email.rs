use async_trait::async_trait;
use lettre::message::{header, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;

use crate::config::MailConfig;
use crate::pages::escape;

#[derive(Debug, thiserror::Error)]
#[error("failed to deliver mail to {to}: {reason}")]
pub struct DeliveryFailure {
    pub to: String,
    pub reason: String,
}

impl DeliveryFailure {
    fn new(to: &str, reason: impl ToString) -> Self {
        DeliveryFailure { to: to.to_string(), reason: reason.to_string() }
    }
}

/// Outbound mail. `send` completes only once the message is accepted or
/// refused; nothing is queued or retried.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryFailure>;
}

pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(SmtpMailer {
            from: Mailbox::new(None, config.username.parse()?),
            transport,
        })
    }
}

fn html_body(body: &str) -> String {
    format!(
        r#"
    <div style="background-color:#6b7280;padding:50px 0">
        <div style="max-width:500px;margin:0 auto;background:#f3f4f6;padding:40px;border-radius:8px;text-align:center;font-family:Arial,sans-serif;">
            <h1 style="color:#000">Confirm Your Account</h1>
            <p style="margin:20px 0;font-size:16px;color:#333">{}</p>
        </div>
    </div>
    "#,
        escape(body)
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryFailure> {
        let recipient: Mailbox = to.parse().map_err(|e| DeliveryFailure::new(to, e))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body(body)),
                    ),
            )
            .map_err(|e| DeliveryFailure::new(to, e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DeliveryFailure::new(to, e))?;

        info!("Mail '{}' sent to {}", subject, to);
        Ok(())
    }
}
