//! Report email composition and the send-or-skip decision.

use crate::app::ports::MailTransport;
use crate::config::EmailSettings;
use crate::error::{ReportError, Result};
use crate::types::EmailReport;
use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use tracing::{info, warn};

/// What happened to the report email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { recipient: String },
    /// Email settings were incomplete; nothing was sent and no connection was made.
    Skipped { missing: Vec<&'static str> },
}

pub fn subject_for(report_date: NaiveDate) -> String {
    format!("CCFGroup Market Data - {}", report_date.format("%Y-%m-%d"))
}

pub fn compose_message(report: &EmailReport, email: &EmailSettings, subject: &str) -> Result<Message> {
    let from: Mailbox = email.sender.parse()?;
    let to: Mailbox = email.recipient.parse()?;
    let builder = Message::builder().from(from).to(to).subject(subject);

    let message = match report {
        EmailReport::Inline { html } => {
            builder.multipart(MultiPart::alternative().singlepart(SinglePart::html(html.clone())))?
        }
        EmailReport::Attachments { files, summary } => {
            let csv_type = ContentType::parse("text/csv; charset=utf-8")
                .map_err(|e| ReportError::Email(format!("content type: {e}")))?;
            let mut body = MultiPart::mixed().singlepart(SinglePart::plain(summary.clone()));
            for file in files {
                body = body.singlepart(
                    Attachment::new(file.filename.clone()).body(file.bytes.clone(), csv_type.clone()),
                );
            }
            builder.multipart(body)?
        }
    };
    Ok(message)
}

/// Sends `report` when all email settings are present; otherwise warns and skips.
/// `connect` is only called once a message is ready, so a skipped run never touches the relay.
pub fn deliver<F, T>(
    report: &EmailReport,
    email: std::result::Result<EmailSettings, Vec<&'static str>>,
    subject: &str,
    connect: F,
) -> Result<Delivery>
where
    F: FnOnce(&EmailSettings) -> Result<T>,
    T: MailTransport,
{
    let settings = match email {
        Ok(settings) => settings,
        Err(missing) => {
            warn!(
                "Email settings incomplete ({}); skipping send",
                missing.join(", ")
            );
            return Ok(Delivery::Skipped { missing });
        }
    };

    let message = compose_message(report, &settings, subject)?;
    let transport = connect(&settings)?;
    transport.send(&message)?;
    info!("Report emailed to {}", settings.recipient);

    Ok(Delivery::Sent {
        recipient: settings.recipient,
    })
}
