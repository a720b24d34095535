mod common;

use chrono::NaiveDate;
use common::{credentials, CapturingTransport, FakePortal};
use market_report::config::EmailSettings;
use market_report::constants::{
    BENZENE_DAILY_LISTING_URL, STYRENE_DAILY_LISTING_URL, STYRENE_WEEKLY_LISTING_URL,
};
use market_report::error::Result;
use market_report::mailer::Delivery;
use market_report::pipeline::{Pipeline, PipelineOptions};
use market_report::report::UTF8_BOM;
use market_report::types::OutputMode;
use std::cell::RefCell;
use std::path::Path;

const BASE: &str = "https://www.ccfgroup.com";
const BENZENE_REPORT: &str = "https://www.ccfgroup.com/newscenter/newsview.php?Info_ID=101";
const WEEKLY_REPORT: &str = "https://www.ccfgroup.com/newscenter/newsview.php?Info_ID=303";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Benzene daily and styrene weekly resolve; styrene daily has no dated link on or before the cut-off.
fn portal() -> FakePortal {
    FakePortal::new()
        .with_page(
            BENZENE_DAILY_LISTING_URL,
            r#"<a href="/newscenter/newsview.php?Info_ID=100">Benzene market daily (Nov 01, 2024)</a>
               <a href="/newscenter/newsview.php?Info_ID=101">Benzene market daily (Nov 03, 2024)</a>"#,
        )
        .with_page(
            STYRENE_DAILY_LISTING_URL,
            r#"<a href="/newscenter/newsview.php?Info_ID=201">Styrene monomer market daily (Nov 05, 2024)</a>"#,
        )
        .with_page(
            STYRENE_WEEKLY_LISTING_URL,
            r#"<a href="/newscenter/newsview.php?Info_ID=303">Styrene monomer market weekly (Nov 01, 2024)</a>
               <a href="/newscenter/newsview.php?Info_ID=302">Styrene monomer market weekly (Oct 25, 2024)</a>"#,
        )
        .with_page(
            BENZENE_REPORT,
            r#"<html><body>
                 <table><thead><tr><th>Market</th><th>Price</th></tr></thead>
                   <tbody><tr><td>CFR China</td><td>1,020</td></tr></tbody></table>
                 <table><tr><th>Date</th><th>Inventory</th></tr><tr><td>Nov 03</td><td>12.5</td></tr></table>
               </body></html>"#,
        )
        .with_page(WEEKLY_REPORT, "<html><body><p>No tables this week</p></body></html>")
}

fn options(mode: OutputMode, output_dir: &Path) -> PipelineOptions {
    PipelineOptions {
        mode,
        as_of: day(2024, 11, 4),
        report_date: day(2024, 11, 5),
        output_dir: output_dir.to_path_buf(),
    }
}

fn email() -> EmailSettings {
    EmailSettings {
        sender: "desk@example.com".to_string(),
        password: "app-password".to_string(),
        recipient: "trader@example.com".to_string(),
    }
}

#[test]
fn resolves_then_logs_in_then_fetches() {
    let portal = portal();
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(&portal, BASE).unwrap();
    let sent = RefCell::new(Vec::new());

    pipeline
        .execute(
            &credentials(),
            &options(OutputMode::Inline, &dir.path().join("output")),
            Ok(email()),
            |_| Ok(CapturingTransport { sent: &sent }),
        )
        .unwrap();

    assert_eq!(
        portal.calls(),
        vec![
            format!("GET {BENZENE_DAILY_LISTING_URL}"),
            format!("GET {STYRENE_DAILY_LISTING_URL}"),
            format!("GET {STYRENE_WEEKLY_LISTING_URL}"),
            "LOGIN member".to_string(),
            format!("GET {BENZENE_REPORT}"),
            format!("GET {WEEKLY_REPORT}"),
        ]
    );
}

#[test]
fn inline_report_marks_empty_categories() {
    let portal = portal();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let pipeline = Pipeline::new(&portal, BASE).unwrap();
    let sent = RefCell::new(Vec::new());

    let result = pipeline
        .execute(
            &credentials(),
            &options(OutputMode::Inline, &out),
            Ok(email()),
            |_| Ok(CapturingTransport { sent: &sent }),
        )
        .unwrap();

    assert_eq!(result.total_tables(), 2);
    assert_eq!(result.attachments, 0);
    assert_eq!(
        result.delivery,
        Delivery::Sent {
            recipient: "trader@example.com".to_string()
        }
    );
    assert!(!out.exists());

    let summaries: Vec<_> = result
        .categories
        .iter()
        .map(|c| (c.category.slug(), c.url.as_deref(), c.tables))
        .collect();
    assert_eq!(
        summaries,
        vec![
            ("benzene_daily", Some(BENZENE_REPORT), 2),
            ("styrene_daily", None, 0),
            ("styrene_weekly", Some(WEEKLY_REPORT), 0),
        ]
    );

    let messages = sent.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Subject: CCFGroup Market Data - 2024-11-05"));
}

#[test]
fn inline_html_contains_placeholder_per_empty_category() {
    let portal = portal();
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(&portal, BASE).unwrap();

    let resolved = pipeline.resolve_links(day(2024, 11, 4)).unwrap();
    let (report, _) = pipeline
        .run(&resolved, &options(OutputMode::Inline, dir.path()))
        .unwrap();

    let html = match report {
        market_report::types::EmailReport::Inline { html } => html,
        other => panic!("expected inline report, got {other:?}"),
    };
    assert_eq!(html.matches("<p>no data</p>").count(), 2);
    assert!(html.contains("<td>CFR China</td>"));
    assert!(html.contains("<h4>Table 2</h4>"));
}

#[test]
fn attachment_mode_writes_csv_only_for_categories_with_tables() {
    let portal = portal();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let pipeline = Pipeline::new(&portal, BASE).unwrap();
    let sent = RefCell::new(Vec::new());

    let result = pipeline
        .execute(
            &credentials(),
            &options(OutputMode::Attachments, &out),
            Ok(email()),
            |_| Ok(CapturingTransport { sent: &sent }),
        )
        .unwrap();

    assert_eq!(result.attachments, 2);
    let mut files: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    files.sort();
    assert_eq!(files, vec!["benzene_daily_table_1.csv", "benzene_daily_table_2.csv"]);

    let first = std::fs::read(out.join("benzene_daily_table_1.csv")).unwrap();
    assert!(first.starts_with(UTF8_BOM));
    assert_eq!(&first[UTF8_BOM.len()..], b"Market,Price\nCFR China,\"1,020\"\n");

    let raw = &sent.borrow()[0];
    assert!(raw.contains("benzene_daily_table_2.csv"));
}

#[test]
fn missing_email_settings_skip_send_without_connecting() {
    let portal = portal();
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(&portal, BASE).unwrap();

    let result = pipeline
        .execute(
            &credentials(),
            &options(OutputMode::Inline, dir.path()),
            EmailSettings::from_lookup(|_| None),
            |_| -> Result<CapturingTransport<'static>> { panic!("SMTP must not be contacted") },
        )
        .unwrap();

    assert_eq!(
        result.delivery,
        Delivery::Skipped {
            missing: vec!["SENDER_EMAIL", "SENDER_PASSWORD", "RECIPIENT_EMAIL"]
        }
    );
}

#[test]
fn report_fetch_failure_aborts_before_sending() {
    // benzene listing resolves to a page the portal cannot serve
    let portal = FakePortal::new()
        .with_page(
            BENZENE_DAILY_LISTING_URL,
            r#"<a href="/gone.php">Benzene market daily (Nov 03, 2024)</a>"#,
        )
        .with_page(STYRENE_DAILY_LISTING_URL, "")
        .with_page(STYRENE_WEEKLY_LISTING_URL, "");
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(&portal, BASE).unwrap();
    let sent = RefCell::new(Vec::new());

    let result = pipeline.execute(
        &credentials(),
        &options(OutputMode::Attachments, &dir.path().join("output")),
        Ok(email()),
        |_| Ok(CapturingTransport { sent: &sent }),
    );

    assert!(result.is_err());
    assert!(sent.borrow().is_empty());
}
