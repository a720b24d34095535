use crate::constants::{
    BROWSER_USER_AGENT, DEFAULT_CONFIG_PATH, DEFAULT_OFFSET_DAYS, DEFAULT_OUTPUT_DIR,
    DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_SECS, ENV_PORTAL_PASSWORD,
    ENV_PORTAL_USERNAME, ENV_RECIPIENT_EMAIL, ENV_SENDER_EMAIL, ENV_SENDER_PASSWORD,
    PORTAL_BASE_URL, PORTAL_LOGIN_URL,
};
use crate::error::{ReportError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalSettings,
    pub report: ReportSettings,
    pub smtp: SmtpSettings,
}

/// Everything the HTTP session needs; built once and handed to the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub base_url: String,
    pub login_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// The portal serves a certificate that does not validate.
    pub accept_invalid_certs: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: PORTAL_BASE_URL.to_string(),
            login_url: PORTAL_LOGIN_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_invalid_certs: true,
            username: None,
            password: None,
        }
    }
}

impl PortalSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub offset_days: i64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            offset_days: DEFAULT_OFFSET_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Sender/recipient pair for the report email. All three values come from the environment.
#[derive(Clone)]
pub struct EmailSettings {
    pub sender: String,
    pub password: String,
    pub recipient: String,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("sender", &self.sender)
            .field("password", &"***")
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl EmailSettings {
    /// Returns the settings, or the names of the variables that were missing or blank.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, Vec<&'static str>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &'static str, missing: &mut Vec<&'static str>| {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let mut missing = Vec::new();
        let sender = read(ENV_SENDER_EMAIL, &mut missing);
        let password = read(ENV_SENDER_PASSWORD, &mut missing);
        let recipient = read(ENV_RECIPIENT_EMAIL, &mut missing);

        if missing.is_empty() {
            Ok(Self { sender, password, recipient })
        } else {
            Err(missing)
        }
    }

    pub fn from_env() -> std::result::Result<Self, Vec<&'static str>> {
        Self::from_lookup(env_var)
    }
}

impl Config {
    /// Loads the TOML config. An explicit path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !config_path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ReportError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.portal.timeout_seconds == 0 {
            return Err(ReportError::Config("portal.timeout_seconds must be positive".into()));
        }
        if self.report.offset_days < 0 {
            return Err(ReportError::Config("report.offset_days must not be negative".into()));
        }
        Ok(())
    }

    /// Portal login: environment first, then the config file. Nothing is compiled in.
    pub fn portal_credentials_from<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup(ENV_PORTAL_USERNAME)
            .or_else(|| self.portal.username.clone())
            .filter(|v| !v.is_empty())
            .ok_or(ReportError::MissingCredential(ENV_PORTAL_USERNAME))?;
        let password = lookup(ENV_PORTAL_PASSWORD)
            .or_else(|| self.portal.password.clone())
            .filter(|v| !v.is_empty())
            .ok_or(ReportError::MissingCredential(ENV_PORTAL_PASSWORD))?;
        Ok(Credentials { username, password })
    }

    pub fn portal_credentials(&self) -> Result<Credentials> {
        self.portal_credentials_from(env_var)
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
