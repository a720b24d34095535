//! Turns extracted tables into the email payload, in either delivery shape.

pub mod csv_out;
pub mod html;

use crate::error::Result;
use crate::types::{CategoryTables, EmailReport, OutputMode};
use std::fmt::Write as _;
use std::path::Path;

pub use csv_out::{csv_filename, table_to_csv, write_csv_files, UTF8_BOM};
pub use html::render_inline_report;

/// Builds the report for `mode`. Only attachment mode touches `output_dir`.
pub fn build_report(
    mode: OutputMode,
    categories: &[CategoryTables],
    output_dir: &Path,
    report_date: &str,
) -> Result<EmailReport> {
    match mode {
        OutputMode::Attachments => {
            let files = write_csv_files(output_dir, categories)?;
            Ok(EmailReport::Attachments {
                files,
                summary: summary_text(categories, report_date),
            })
        }
        OutputMode::Inline => Ok(EmailReport::Inline {
            html: render_inline_report(categories, report_date)?,
        }),
    }
}

/// Plain-text body for attachment mode.
pub fn summary_text(categories: &[CategoryTables], report_date: &str) -> String {
    let mut text = format!("CCFGroup market data for {report_date}\n\n");
    for entry in categories {
        let _ = match &entry.link {
            Some(link) => writeln!(
                text,
                "{}: {} table(s) from {}",
                entry.category.heading(),
                entry.tables.len(),
                link.url
            ),
            None => writeln!(text, "{}: no report found", entry.category.heading()),
        };
    }
    text.push_str("\nThis email was generated automatically.\n");
    text
}
