use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

use crate::domain::entity::notification::OutgoingMail;
use crate::domain::service::{DeliveryError, MailTransport};
use crate::infrastructure::config::SmtpConfig;

pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn new(cfg: &SmtpConfig) -> Result<Self, DeliveryError> {
        let builder = if cfg.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host).map_err(
                |e: lettre::transport::smtp::Error| DeliveryError::ConnectionFailed(e.to_string()),
            )?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&cfg.host)
        };
        let mut builder = builder.port(cfg.port);
        if let Some(ref username) = cfg.username {
            let password = cfg
                .password
                .as_ref()
                .map(|p| p.expose_secret().clone())
                .unwrap_or_default();
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        let address = cfg
            .from_address
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                DeliveryError::InvalidAddress(format!("from address: {}", e))
            })?;

        Ok(Self {
            mailer: builder.build(),
            from: Mailbox::new(cfg.from_name.clone(), address),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError> {
        let address = mail
            .to_email
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                DeliveryError::InvalidAddress(format!("recipient {}: {}", mail.to_email, e))
            })?;
        let to = Mailbox::new(Some(mail.to_name.clone()), address);

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body.clone())
            .map_err(|e| DeliveryError::Other(format!("failed to build email: {}", e)))?;

        let response = self
            .mailer
            .send(email)
            .await
            .map_err(|e: lettre::transport::smtp::Error| {
                if e.is_permanent() {
                    DeliveryError::Rejected(e.to_string())
                } else {
                    DeliveryError::ConnectionFailed(e.to_string())
                }
            })?;

        tracing::debug!(code = %response.code(), recipient = %mail.to_email, "smtp accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            username: None,
            password: None,
            from_address: "noreply@example.com".to_string(),
            from_name: Some("Acme".to_string()),
            starttls: false,
        }
    }

    #[test]
    fn new_with_valid_params() {
        let transport = SmtpMailTransport::new(&cfg()).unwrap();
        assert_eq!(transport.from.to_string(), "Acme <noreply@example.com>");
    }

    #[test]
    fn invalid_from_address_is_rejected() {
        let mut cfg = cfg();
        cfg.from_address = "not-an-address".to_string();
        assert!(matches!(
            SmtpMailTransport::new(&cfg),
            Err(DeliveryError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn invalid_recipient_fails_before_connecting() {
        let transport = SmtpMailTransport::new(&cfg()).unwrap();
        let mail = OutgoingMail {
            to_email: "broken".to_string(),
            to_name: "Broken".to_string(),
            subject: "s".to_string(),
            html_body: "b".to_string(),
        };
        assert!(matches!(
            transport.send(&mail).await,
            Err(DeliveryError::InvalidAddress(_))
        ));
    }
}
