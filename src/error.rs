use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing portal credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid URL '{url}': {message}")]
    Url { url: String, message: String },

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Email build failed: {0}")]
    Email(String),

    #[error("SMTP transport failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl From<lettre::error::Error> for ReportError {
    fn from(e: lettre::error::Error) -> Self {
        ReportError::Email(e.to_string())
    }
}

impl From<lettre::address::AddressError> for ReportError {
    fn from(e: lettre::address::AddressError) -> Self {
        ReportError::Email(format!("invalid address: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
