#![allow(dead_code)]

use market_report::app::ports::{MailTransport, PageFetcher, PortalSession};
use market_report::config::Credentials;
use market_report::error::{ReportError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

/// In-memory portal: serves canned pages and records every call in order.
#[derive(Default)]
pub struct FakePortal {
    pages: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PageFetcher for FakePortal {
    fn get_page(&self, url: &str) -> Result<String> {
        self.calls.borrow_mut().push(format!("GET {url}"));
        self.pages.get(url).cloned().ok_or_else(|| {
            ReportError::Io(io::Error::new(io::ErrorKind::NotFound, format!("404 {url}")))
        })
    }
}

impl PortalSession for FakePortal {
    fn login(&self, credentials: &Credentials) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("LOGIN {}", credentials.username));
        Ok(())
    }
}

/// Mail transport that keeps the raw messages instead of sending them.
pub struct CapturingTransport<'a> {
    pub sent: &'a RefCell<Vec<String>>,
}

impl MailTransport for CapturingTransport<'_> {
    fn send(&self, message: &lettre::Message) -> Result<()> {
        self.sent
            .borrow_mut()
            .push(String::from_utf8_lossy(&message.formatted()).into_owned());
        Ok(())
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "member".to_string(),
        password: "secret".to_string(),
    }
}
