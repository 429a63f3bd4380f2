use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, Transport as _};

use super::{Email, Transport};
use crate::error::NotifyError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Authenticated SMTP relay over implicit TLS. The connection is opened per
/// send; one mail goes out per run.
pub struct SmtpTransport {
    host: String,
    port: Option<u16>,
    username: String,
    password: String,
}

impl SmtpTransport {
    pub fn new(host: String, port: Option<u16>, username: String, password: String) -> Self {
        SmtpTransport {
            host,
            port,
            username,
            password,
        }
    }
}

fn parse_address(address: &str) -> Result<Address, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

pub fn build_message(email: &Email) -> Result<Message, NotifyError> {
    let from = Mailbox::new(Some(email.from_name.clone()), parse_address(&email.from_address)?);
    let to = Mailbox::new(None, parse_address(&email.to)?);

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())?;

    Ok(message)
}

impl Transport for SmtpTransport {
    fn send(&self, email: &Email) -> Result<String, NotifyError> {
        let message = build_message(email)?;

        let mut builder = lettre::SmtpTransport::relay(&self.host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .credentials(Credentials::new(self.username.clone(), self.password.clone()));
        if let Some(port) = self.port {
            builder = builder.port(port);
        }

        let response = builder
            .build()
            .send(&message)
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let text: Vec<&str> = response.message().collect();
        Ok(format!("{} {}", response.code(), text.join(" ")))
    }
}

/// Stands in for SMTP when a mail variable is unset. Every send fails, so
/// the check still runs and saves while the mail error is logged.
pub struct UnconfiguredTransport {
    missing: &'static str,
}

impl UnconfiguredTransport {
    pub fn new(missing: &'static str) -> Self {
        UnconfiguredTransport { missing }
    }
}

impl Transport for UnconfiguredTransport {
    fn send(&self, _email: &Email) -> Result<String, NotifyError> {
        Err(NotifyError::NotConfigured(self.missing))
    }
}

/// Prints the report instead of mailing it.
pub struct StdoutTransport;

impl Transport for StdoutTransport {
    fn send(&self, email: &Email) -> Result<String, NotifyError> {
        build_message(email)?;

        println!("To: {}", email.to);
        println!("Subject: {}", email.subject);
        println!();
        println!("{}", email.html);
        Ok("printed to stdout (dry run)".to_string())
    }
}
