use crate::app::ports::{MailTransport, PortalSession};
use crate::config::{Credentials, EmailSettings};
use crate::error::Result;
use crate::mailer::{self, Delivery};
use crate::parser::extract_tables;
use crate::report::build_report;
use crate::resolver::{parse_base_url, resolve_category};
use crate::types::{CategoryTables, EmailReport, OutputMode, ReportCategory, ReportLink};
use chrono::NaiveDate;
use reqwest::Url;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Per-run knobs decided by the caller.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub mode: OutputMode,
    /// Cut-off for daily report links.
    pub as_of: NaiveDate,
    /// Date shown in the subject and report body.
    pub report_date: NaiveDate,
    pub output_dir: PathBuf,
}

/// Result of a complete pipeline run
#[derive(Debug)]
pub struct PipelineResult {
    pub categories: Vec<CategorySummary>,
    pub attachments: usize,
    pub delivery: Delivery,
}

#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category: ReportCategory,
    pub url: Option<String>,
    pub tables: usize,
}

impl PipelineResult {
    pub fn total_tables(&self) -> usize {
        self.categories.iter().map(|c| c.tables).sum()
    }
}

/// Resolve, log in, fetch, build, send. Strictly in that order, first error wins.
pub struct Pipeline<'a, S: PortalSession> {
    session: &'a S,
    base_url: Url,
}

impl<'a, S: PortalSession> Pipeline<'a, S> {
    pub fn new(session: &'a S, base_url: &str) -> Result<Self> {
        Ok(Self {
            session,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Resolves every category's listing page. Runs before login; listings are public.
    #[instrument(skip(self))]
    pub fn resolve_links(&self, as_of: NaiveDate) -> Result<Vec<(ReportCategory, Option<ReportLink>)>> {
        ReportCategory::ALL
            .iter()
            .map(|&category| {
                resolve_category(self.session, category, as_of, &self.base_url)
                    .map(|link| (category, link))
            })
            .collect()
    }

    /// Fetches each resolved page with the session and extracts its tables.
    /// An unresolved category yields an empty table list.
    #[instrument(skip(self, resolved))]
    pub fn fetch_tables(
        &self,
        resolved: &[(ReportCategory, Option<ReportLink>)],
    ) -> Result<Vec<CategoryTables>> {
        let mut out = Vec::with_capacity(resolved.len());
        for (category, link) in resolved {
            let tables = match link {
                Some(link) => {
                    let html = self.session.get_page(&link.url)?;
                    extract_tables(&html)
                }
                None => Vec::new(),
            };
            info!("{} tables: {}", category, tables.len());
            out.push(CategoryTables {
                category: *category,
                link: link.clone(),
                tables,
            });
        }
        Ok(out)
    }

    /// Fetches the resolved pages and assembles the email payload.
    pub fn run(
        &self,
        resolved: &[(ReportCategory, Option<ReportLink>)],
        options: &PipelineOptions,
    ) -> Result<(EmailReport, Vec<CategoryTables>)> {
        let categories = self.fetch_tables(resolved)?;
        let report_date = options.report_date.format("%Y-%m-%d").to_string();
        let report = build_report(options.mode, &categories, &options.output_dir, &report_date)?;
        Ok((report, categories))
    }

    /// Runs the whole job. `connect` builds the mail transport and is skipped when email settings are incomplete.
    #[instrument(skip_all, fields(mode = ?options.mode, as_of = %options.as_of))]
    pub fn execute<F, T>(
        &self,
        credentials: &Credentials,
        options: &PipelineOptions,
        email: std::result::Result<EmailSettings, Vec<&'static str>>,
        connect: F,
    ) -> Result<PipelineResult>
    where
        F: FnOnce(&EmailSettings) -> Result<T>,
        T: MailTransport,
    {
        info!("🚀 Starting market report run");

        let resolved = self.resolve_links(options.as_of)?;
        self.session.login(credentials)?;

        let (report, categories) = self.run(&resolved, options)?;
        let subject = mailer::subject_for(options.report_date);
        let delivery = mailer::deliver(&report, email, &subject, connect)?;

        let result = PipelineResult {
            categories: categories
                .iter()
                .map(|c| CategorySummary {
                    category: c.category,
                    url: c.link.as_ref().map(|l| l.url.clone()),
                    tables: c.tables.len(),
                })
                .collect(),
            attachments: report.attachment_count(),
            delivery,
        };
        info!(
            "✅ Run finished: {} tables, {} attachments",
            result.total_tables(),
            result.attachments
        );
        Ok(result)
    }
}
