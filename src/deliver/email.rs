// src/deliver/email.rs
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{Address, AsyncTransport, Tokio1Executor};

use super::{DeliveryConfig, DeliverySink, MessageId};
use crate::error::DeliveryError;

pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailSender {
    pub fn new(cfg: &DeliveryConfig, user: &str, password: &str) -> Result<Self, DeliveryError> {
        let address: Address = user
            .parse()
            .map_err(|e| DeliveryError(format!("invalid SMTP_USER {user}: {e}")))?;
        let from = Mailbox::new(Some(cfg.from_name.clone()), address);

        let creds = Credentials::new(user.to_string(), password.to_string());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .map_err(|e| DeliveryError(format!("invalid smtp host {}: {e}", cfg.smtp_host)))?
            .credentials(creds)
            .build();

        Ok(Self { mailer, from })
    }

    /// Plain-text message with a lettre-generated Message-ID, returned alongside.
    fn build_message(
        &self,
        subject: &str,
        body: &str,
        recipient: &str,
    ) -> Result<(Message, MessageId), DeliveryError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| DeliveryError(format!("invalid recipient {recipient}: {e}")))?;

        let msg = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .message_id(None)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DeliveryError(format!("build email: {e}")))?;

        let id = msg
            .headers()
            .get_raw("Message-ID")
            .map(str::to_string)
            .ok_or_else(|| DeliveryError("email has no Message-ID".into()))?;
        Ok((msg, id))
    }
}

#[async_trait]
impl DeliverySink for EmailSender {
    async fn deliver(
        &self,
        subject: &str,
        body: &str,
        recipient: &str,
    ) -> Result<MessageId, DeliveryError> {
        let (msg, id) = self.build_message(subject, body, recipient)?;

        self.mailer
            .send(msg)
            .await
            .map_err(|e| DeliveryError(format!("send email: {e}")))?;
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_sender_address() {
        let err = EmailSender::new(&DeliveryConfig::default(), "not-an-address", "pw")
            .err()
            .unwrap();
        assert!(err.0.contains("SMTP_USER"));
    }

    #[tokio::test]
    async fn message_id_comes_from_the_built_message() {
        let s = EmailSender::new(&DeliveryConfig::default(), "digest@example.com", "pw").unwrap();
        let (msg, id) = s
            .build_message("[Daily Insight] 2026-10-14 Tech Report", "body", "reader@example.com")
            .unwrap();
        assert!(id.starts_with('<') && id.ends_with('>'));
        assert_eq!(msg.headers().get_raw("Message-ID"), Some(id.as_str()));

        let (_, other) = s.build_message("s", "b", "reader@example.com").unwrap();
        assert_ne!(id, other);
    }

    #[tokio::test]
    async fn invalid_recipient_is_a_delivery_error() {
        let s = EmailSender::new(&DeliveryConfig::default(), "digest@example.com", "pw").unwrap();
        let err = s.build_message("s", "b", "not an address").err().unwrap();
        assert!(err.0.contains("invalid recipient"));
    }
}
