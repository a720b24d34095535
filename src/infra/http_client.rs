use crate::app::ports::{PageFetcher, PortalSession};
use crate::config::{Credentials, PortalSettings};
use crate::error::{ReportError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use tracing::{debug, info, instrument, warn};

/// Blocking portal session. The cookie store carries the login to every later request.
pub struct PortalClient {
    client: Client,
    settings: PortalSettings,
}

impl PortalClient {
    pub fn new(settings: PortalSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let referer = HeaderValue::from_str(&settings.login_url).map_err(|e| {
            ReportError::Config(format!("invalid login url '{}': {}", settings.login_url, e))
        })?;
        headers.insert(REFERER, referer);

        if settings.accept_invalid_certs {
            warn!("TLS certificate validation is disabled for the portal session");
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        Ok(Self { client, settings })
    }
}

impl PageFetcher for PortalClient {
    #[instrument(skip(self))]
    fn get_page(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send()?.error_for_status()?;
        let body = resp.text()?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}

impl PortalSession for PortalClient {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    fn login(&self, credentials: &Credentials) -> Result<()> {
        let form = [
            ("custlogin", "1"),
            ("action", "login"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("savecookie", "savecookie"),
        ];

        self.client
            .post(&self.settings.login_url)
            .form(&form)
            .send()?
            .error_for_status()?;

        info!("Logged in to {}", self.settings.base_url);
        Ok(())
    }
}
