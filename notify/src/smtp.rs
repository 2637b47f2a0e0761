//! SMTP relay transport built on `lettre`.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use signoff_types::{SmtpSettings, TlsMode};

use crate::message::ApprovalMessage;
use crate::transport::{MailTransport, NotificationError};

/// Blocking SMTP sender. Connections are opened per message.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotificationError> {
        let builder = match settings.tls() {
            TlsMode::StartTls => SmtpTransport::starttls_relay(settings.host())?,
            TlsMode::Tls => SmtpTransport::relay(settings.host())?,
            TlsMode::None => SmtpTransport::builder_dangerous(settings.host()),
        };

        let mut builder = builder
            .port(settings.port())
            .timeout(Some(settings.timeout()));
        if let Some(creds) = settings.credentials() {
            builder = builder.credentials(Credentials::new(
                creds.username().to_string(),
                creds.password().to_string(),
            ));
        }

        let from = parse_mailbox(settings.from())?;

        tracing::info!(
            host = settings.host(),
            port = settings.port(),
            tls = settings.tls().as_str(),
            "SMTP relay configured"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &ApprovalMessage) -> Result<(), NotificationError> {
        let email = build_email(&self.from, message)?;
        self.transport.send(&email)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse::<Mailbox>()
        .map_err(|source| NotificationError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

fn build_email(from: &Mailbox, message: &ApprovalMessage) -> Result<Message, NotificationError> {
    let to = parse_mailbox(&message.to)?;
    let email = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())?;
    Ok(email)
}
