use crate::config::Credentials;
use crate::error::Result;

/// Read side of the portal session: fetch a page body as text.
/// Any non-success status or transport failure is an error.
pub trait PageFetcher {
    fn get_page(&self, url: &str) -> Result<String>;
}

/// A fetcher that can also authenticate; cookies from `login` apply to later fetches.
pub trait PortalSession: PageFetcher {
    fn login(&self, credentials: &Credentials) -> Result<()>;
}

/// Outgoing mail relay.
pub trait MailTransport {
    fn send(&self, message: &lettre::Message) -> Result<()>;
}
