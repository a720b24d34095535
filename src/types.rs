use crate::constants::{
    BENZENE_DAILY_HEADING, BENZENE_DAILY_LISTING_URL, BENZENE_DAILY_PREFIX, BENZENE_DAILY_SLUG,
    STYRENE_DAILY_HEADING, STYRENE_DAILY_LISTING_URL, STYRENE_DAILY_PREFIX, STYRENE_DAILY_SLUG,
    STYRENE_WEEKLY_HEADING, STYRENE_WEEKLY_LISTING_URL, STYRENE_WEEKLY_PREFIX,
    STYRENE_WEEKLY_SLUG,
};
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// How often a category is published; decides the link selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    Weekly,
}

/// The market reports this job knows how to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportCategory {
    BenzeneDaily,
    StyreneDaily,
    StyreneWeekly,
}

impl ReportCategory {
    /// Report order in the email.
    pub const ALL: [ReportCategory; 3] = [
        ReportCategory::BenzeneDaily,
        ReportCategory::StyreneDaily,
        ReportCategory::StyreneWeekly,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ReportCategory::BenzeneDaily => BENZENE_DAILY_SLUG,
            ReportCategory::StyreneDaily => STYRENE_DAILY_SLUG,
            ReportCategory::StyreneWeekly => STYRENE_WEEKLY_SLUG,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            ReportCategory::BenzeneDaily => BENZENE_DAILY_HEADING,
            ReportCategory::StyreneDaily => STYRENE_DAILY_HEADING,
            ReportCategory::StyreneWeekly => STYRENE_WEEKLY_HEADING,
        }
    }

    pub fn listing_url(&self) -> &'static str {
        match self {
            ReportCategory::BenzeneDaily => BENZENE_DAILY_LISTING_URL,
            ReportCategory::StyreneDaily => STYRENE_DAILY_LISTING_URL,
            ReportCategory::StyreneWeekly => STYRENE_WEEKLY_LISTING_URL,
        }
    }

    pub fn title_prefix(&self) -> &'static str {
        match self {
            ReportCategory::BenzeneDaily => BENZENE_DAILY_PREFIX,
            ReportCategory::StyreneDaily => STYRENE_DAILY_PREFIX,
            ReportCategory::StyreneWeekly => STYRENE_WEEKLY_PREFIX,
        }
    }

    pub fn cadence(&self) -> Cadence {
        match self {
            ReportCategory::BenzeneDaily | ReportCategory::StyreneDaily => Cadence::Daily,
            ReportCategory::StyreneWeekly => Cadence::Weekly,
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A resolved report page. `observed_date` is only known for dated (daily) links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLink {
    pub category: ReportCategory,
    pub url: String,
    pub observed_date: Option<NaiveDate>,
}

/// One HTML table: ordered headers and rows of the same width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Builds a table, padding short rows and trimming long ones to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row index and column header.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.headers.iter().position(|h| h == column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }
}

/// Tables extracted for one category. An unresolved category carries no link and no tables.
#[derive(Debug, Clone)]
pub struct CategoryTables {
    pub category: ReportCategory,
    pub link: Option<ReportLink>,
    pub tables: Vec<ReportTable>,
}

/// Delivery shape of the report email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// One CSV attachment per table
    Attachments,
    /// A single HTML body embedding every table
    Inline,
}

#[derive(Debug, Clone)]
pub struct CsvAttachment {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// The finished report, ready for the mail transport.
#[derive(Debug, Clone)]
pub enum EmailReport {
    Attachments {
        files: Vec<CsvAttachment>,
        summary: String,
    },
    Inline {
        html: String,
    },
}

impl EmailReport {
    pub fn attachment_count(&self) -> usize {
        match self {
            EmailReport::Attachments { files, .. } => files.len(),
            EmailReport::Inline { .. } => 0,
        }
    }
}
