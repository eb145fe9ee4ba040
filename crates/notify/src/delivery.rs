//! Delivery channels: SMTP relay, output artifact, and stdout printing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::error::NotifyError;
use crate::model::Notification;
use crate::template::artifact_block;

/// Something a rendered notification can be handed to.
pub trait DeliveryChannel {
    /// Short label used in logs and reports.
    fn name(&self) -> &'static str;

    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError>;

    /// Flush anything buffered. Called once after the last delivery.
    fn finish(&mut self) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl<C: DeliveryChannel + ?Sized> DeliveryChannel for &mut C {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).deliver(notification)
    }

    fn finish(&mut self) -> Result<(), NotifyError> {
        (**self).finish()
    }
}

impl<C: DeliveryChannel + ?Sized> DeliveryChannel for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).deliver(notification)
    }

    fn finish(&mut self) -> Result<(), NotifyError> {
        (**self).finish()
    }
}

// ---------------------------------------------------------------------------
// SMTP
// ---------------------------------------------------------------------------

/// Plaintext submission to a relay, no authentication. Each message opens its
/// own SMTP session.
pub struct SmtpChannel {
    relay: String,
    sender: Mailbox,
    transport: SmtpTransport,
}

impl SmtpChannel {
    pub fn new(host: &str, port: u16, sender: &str) -> Result<Self, NotifyError> {
        let sender = parse_mailbox(sender)?;
        let transport = SmtpTransport::builder_dangerous(host).port(port).build();
        Ok(Self {
            relay: format!("{host}:{port}"),
            sender,
            transport,
        })
    }
}

impl DeliveryChannel for SmtpChannel {
    fn name(&self) -> &'static str {
        "mail"
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        let message = build_message(&self.sender, notification)?;
        self.transport
            .send(&message)
            .map_err(|e| NotifyError::Transport {
                relay: self.relay.clone(),
                reason: e.to_string(),
            })?;
        info!(recipient = %notification.recipient, subject = %notification.subject, "email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse::<Mailbox>().map_err(|e| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Assemble the RFC 5322 message for `notification`.
pub fn build_message(sender: &Mailbox, notification: &Notification) -> Result<Message, NotifyError> {
    Message::builder()
        .from(sender.clone())
        .to(parse_mailbox(&notification.recipient)?)
        .subject(notification.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())
        .map_err(|e| NotifyError::Message(e.to_string()))
}

// ---------------------------------------------------------------------------
// Output artifact
// ---------------------------------------------------------------------------

/// Writes one block per notification into a text file, separated by a blank
/// line. The file is truncated when the channel is created.
pub struct ArtifactChannel {
    path: PathBuf,
    out: BufWriter<File>,
}

impl ArtifactChannel {
    pub fn create(path: &Path) -> Result<Self, NotifyError> {
        let file = File::create(path).map_err(|e| NotifyError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeliveryChannel for ArtifactChannel {
    fn name(&self) -> &'static str {
        "artifact"
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        self.out
            .write_all(artifact_block(notification).as_bytes())
            .and_then(|()| self.out.write_all(b"\n\n"))
            .map_err(|e| NotifyError::io(&self.path, e))?;
        info!(recipient = %notification.recipient, "writing email");
        Ok(())
    }

    fn finish(&mut self) -> Result<(), NotifyError> {
        self.out.flush().map_err(|e| NotifyError::io(&self.path, e))?;
        info!(path = %self.path.display(), "all emails written");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Print
// ---------------------------------------------------------------------------

/// Prints each notification as a mock email instead of sending it.
pub struct PrintChannel<W: Write> {
    out: W,
}

impl<W: Write> PrintChannel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl PrintChannel<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> DeliveryChannel for PrintChannel<W> {
    fn name(&self) -> &'static str {
        "print"
    }

    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        writeln!(self.out, "[MOCK EMAIL]")?;
        writeln!(self.out, "To: {}", notification.recipient)?;
        writeln!(self.out, "Subject: {}", notification.subject)?;
        writeln!(self.out, "Body:\n{}", notification.body)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), NotifyError> {
        self.out.flush()?;
        Ok(())
    }
}
