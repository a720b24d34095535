pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod mailer;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod types;

// Ports the pipeline depends on, and their reqwest/lettre implementations
pub mod app;
pub mod infra;
