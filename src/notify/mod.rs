//! Report notifier.
//!
//! Renders the check result and hands one mail to an injected transport.
//! Transport failures are logged here and never reach the caller, a failed
//! mail must not stop the snapshot from being saved.

pub mod render;
pub mod smtp;

use chrono::Local;
use log::{error, info};

use crate::error::NotifyError;
use crate::station::Snapshot;
use crate::store::diff::{CheckMode, MatchBy};

pub use smtp::{SmtpTransport, StdoutTransport, UnconfiguredTransport};

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

pub trait Transport {
    /// Sends one message, returning the transport's acknowledgement.
    fn send(&self, email: &Email) -> Result<String, NotifyError>;
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from_name: String,
    pub sender: String,
    pub recipient: String,
}

pub struct Notifier {
    transport: Box<dyn Transport>,
    settings: MailSettings,
    match_by: MatchBy,
}

impl Notifier {
    pub fn new(transport: Box<dyn Transport>, settings: MailSettings, match_by: MatchBy) -> Self {
        Notifier {
            transport,
            settings,
            match_by,
        }
    }

    pub fn compose(&self, old: Option<&Snapshot>, new: &Snapshot, mode: CheckMode) -> Email {
        let checked_at = Local::now().format("%Y-%m-%d %H:%M").to_string();
        let rendered = render::render(old, new, mode, self.match_by, &checked_at);

        Email {
            from_name: self.settings.from_name.clone(),
            from_address: self.settings.sender.clone(),
            to: self.settings.recipient.clone(),
            subject: rendered.subject,
            html: rendered.html,
        }
    }

    pub fn try_notify(
        &self,
        old: Option<&Snapshot>,
        new: &Snapshot,
        mode: CheckMode,
    ) -> Result<String, NotifyError> {
        let email = self.compose(old, new, mode);
        self.transport.send(&email)
    }

    /// Sends the report, logging the outcome. Returns whether it went out.
    pub fn notify(&self, old: Option<&Snapshot>, new: &Snapshot, mode: CheckMode) -> bool {
        match self.try_notify(old, new, mode) {
            Ok(ack) => {
                info!("mail sent to {}", self.settings.recipient);
                info!("transport response: {ack}");
                true
            }
            Err(e) => {
                error!("could not send mail: {e}");
                false
            }
        }
    }
}
