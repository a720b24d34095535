use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use market_report::config::{Config, EmailSettings};
use market_report::infra::http_client::PortalClient;
use market_report::infra::smtp::SmtpMailer;
use market_report::logging;
use market_report::mailer::Delivery;
use market_report::pipeline::{Pipeline, PipelineOptions};
use market_report::resolver::as_of_date;
use market_report::types::OutputMode;

#[derive(Parser)]
#[command(name = "market_report")]
#[command(about = "Collects CCFGroup market report tables and emails them")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve, log in, fetch the report tables and send the email
    Run {
        /// Email shape: CSV attachments or one inline HTML report
        #[arg(long, value_enum, default_value_t = OutputMode::Inline)]
        mode: OutputMode,
        /// Cut-off date for daily reports (default: today minus the configured offset)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Where CSV files are written in attachment mode
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the report links that would be fetched, without logging in
    Resolve {
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    let today = Local::now().date_naive();
    let client = PortalClient::new(config.portal.clone())?;
    let pipeline = Pipeline::new(&client, &config.portal.base_url)?;

    match cli.command {
        Commands::Resolve { as_of } => {
            let as_of = as_of.unwrap_or_else(|| as_of_date(today, config.report.offset_days));
            println!("=== Report links (as of {as_of}) ===");
            for (category, link) in pipeline.resolve_links(as_of)? {
                match link {
                    Some(link) => println!("{}: {}", category, link.url),
                    None => println!("{}: none", category),
                }
            }
        }
        Commands::Run {
            mode,
            as_of,
            output_dir,
        } => {
            let credentials = config.portal_credentials()?;
            let options = PipelineOptions {
                mode,
                as_of: as_of.unwrap_or_else(|| as_of_date(today, config.report.offset_days)),
                report_date: today,
                output_dir: output_dir.unwrap_or_else(|| config.report.output_dir.clone()),
            };

            let timeout = config.portal.timeout();
            let result = pipeline
                .execute(&credentials, &options, EmailSettings::from_env(), |email| {
                    SmtpMailer::new(&config.smtp, email, timeout)
                })
                .map_err(|e| {
                    error!("Run failed: {}", e);
                    e
                })?;

            println!("\n📊 Market report results:");
            for summary in &result.categories {
                match &summary.url {
                    Some(url) => println!("   {}: {} tables ({})", summary.category, summary.tables, url),
                    None => println!("   {}: no report found", summary.category),
                }
            }
            println!("   Total tables: {}", result.total_tables());
            if mode == OutputMode::Attachments {
                println!("   CSV files: {}", result.attachments);
            }
            match &result.delivery {
                Delivery::Sent { recipient } => println!("✅ Email sent to {}", recipient),
                Delivery::Skipped { missing } => {
                    println!("⚠️  Email not sent; set {}", missing.join(", "))
                }
            }
            info!("Done");
        }
    }

    Ok(())
}
