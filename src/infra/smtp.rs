use crate::app::ports::MailTransport;
use crate::config::{EmailSettings, SmtpSettings};
use crate::error::Result;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::{error, info};

/// STARTTLS relay on the submission port, authenticated as the sender.
pub struct SmtpMailer {
    transport: SmtpTransport,
    host: String,
}

impl SmtpMailer {
    pub fn new(smtp: &SmtpSettings, email: &EmailSettings, timeout: Duration) -> Result<Self> {
        let transport = SmtpTransport::starttls_relay(&smtp.host)?
            .port(smtp.port)
            .credentials(Credentials::new(email.sender.clone(), email.password.clone()))
            .timeout(Some(timeout))
            .build();
        Ok(Self {
            transport,
            host: smtp.host.clone(),
        })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &Message) -> Result<()> {
        match Transport::send(&self.transport, message) {
            Ok(response) => {
                info!(host = %self.host, code = %response.code(), "Email accepted by relay");
                Ok(())
            }
            Err(e) => {
                error!(host = %self.host, "Email send failed: {}", e);
                Err(e.into())
            }
        }
    }
}
