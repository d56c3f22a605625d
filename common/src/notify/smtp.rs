use anyhow::{bail, Context as _};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        AsyncSmtpTransportBuilder,
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{config::SmtpConfig, entities::contact_message::ContactMessage};

use super::Notifier;

const IMPLICIT_TLS_PORT: u16 = 465;
const SUBMISSION_PORT: u16 = 587;

/// Direct delivery through an SMTP relay. The transport keeps a connection
/// pool for the lifetime of the process.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = transport_builder(&config.host, config.port)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.parse().context("Invalid MAIL_FROM address")?,
            to: config.to.parse().context("Invalid MAIL_TO address")?,
        })
    }

    pub async fn verify(&self) -> anyhow::Result<()> {
        if !self.transport.test_connection().await? {
            bail!("SMTP server did not accept the connection");
        }
        Ok(())
    }
}

/// 465 is implicit TLS and 587 requires STARTTLS. Any other port (a local
/// relay on 25, a dev mail catcher on 1025) upgrades only when the server
/// offers STARTTLS.
fn transport_builder(host: &str, port: u16) -> anyhow::Result<AsyncSmtpTransportBuilder> {
    let builder = match port {
        IMPLICIT_TLS_PORT => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
        SUBMISSION_PORT => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
        _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .tls(Tls::Opportunistic(TlsParameters::new(host.to_string())?)),
    };
    Ok(builder.port(port))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn notify(&self, message: &ContactMessage) -> anyhow::Result<()> {
        let letter = compose(&self.from, &self.to, message)?;
        self.transport
            .send(letter)
            .await
            .context("Error sending email")?;
        Ok(())
    }
}

/// Plain-text email for the site owner. Replies go to the submitter when
/// their address parses; it is never validated otherwise.
pub fn compose(from: &Mailbox, to: &Mailbox, message: &ContactMessage) -> anyhow::Result<Message> {
    let mut builder = Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(format!("New contact form submission: {}", message.subject))
        .header(ContentType::TEXT_PLAIN);

    if let Ok(address) = message.email.parse::<Address>() {
        builder = builder.reply_to(Mailbox::new(Some(message.name.clone()), address));
    }

    let body = format!(
        "Name: {}\nEmail: {}\nSubject: {}\nSubmitted at: {}\n\n{}\n",
        message.name,
        message.email,
        message.subject,
        message.submitted_at.to_rfc3339(),
        message.message,
    );

    builder.body(body).context("Error building email")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn message(email: &str) -> ContactMessage {
        ContactMessage {
            id: 1,
            name: "Ann".to_string(),
            email: email.to_string(),
            subject: "Hi".to_string(),
            message: "Hello there".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    fn mailboxes() -> (Mailbox, Mailbox) {
        (
            "site@example.com".parse().unwrap(),
            "owner@example.com".parse().unwrap(),
        )
    }

    #[test]
    fn letter_carries_fields_and_timestamp() {
        let (from, to) = mailboxes();
        let letter = compose(&from, &to, &message("a@x.com")).unwrap();
        let raw = String::from_utf8(letter.formatted()).unwrap();

        assert!(raw.contains("Subject: New contact form submission: Hi"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("Reply-To:"));
        assert!(raw.contains("<a@x.com>"));
        assert!(raw.contains("Submitted at: 2024-03-01T12:30:00+00:00"));
        assert!(raw.contains("Hello there"));
    }

    #[test]
    fn unparsable_submitter_address_skips_reply_to() {
        let (from, to) = mailboxes();
        let letter = compose(&from, &to, &message("not an address")).unwrap();
        let raw = String::from_utf8(letter.formatted()).unwrap();

        assert!(!raw.contains("Reply-To"));
        assert!(raw.contains("Email: not an address"));
    }

    #[actix_web::test]
    async fn transport_builds_for_tls_and_plain_relays() {
        for port in [465, 587, 25, 1025] {
            let notifier = SmtpNotifier::new(&SmtpConfig {
                host: "localhost".to_string(),
                port,
                username: "site@example.com".to_string(),
                password: "secret".to_string(),
                from: "site@example.com".to_string(),
                to: "owner@example.com".to_string(),
            });
            assert!(notifier.is_ok(), "port {}", port);
        }
    }
}
