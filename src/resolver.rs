//! Picks the one report link worth fetching off a listing page.
//!
//! Both rules share a single anchor scan: keep anchors whose visible text
//! starts with the title prefix, then either take the newest dated link on
//! or before the cut-off date, or the first match in document order.

use crate::app::ports::PageFetcher;
use crate::constants::LINK_DATE_FORMAT;
use crate::error::{ReportError, Result};
use crate::types::{Cadence, ReportCategory, ReportLink};
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("static selector"));

/// "Nov 03, 2024": fields separated by at least one whitespace character, nothing around them.
static DATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}\s+\d{1,2},\s+\d{4}$").expect("static regex"));

/// Link selection rule for a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    /// Newest link whose parenthesized date is on or before `as_of`.
    LatestDated { as_of: NaiveDate },
    /// First link in document order, dates ignored.
    FirstMatch,
}

impl LinkStrategy {
    pub fn for_cadence(cadence: Cadence, as_of: NaiveDate) -> Self {
        match cadence {
            Cadence::Daily => LinkStrategy::LatestDated { as_of },
            Cadence::Weekly => LinkStrategy::FirstMatch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedLink {
    pub url: String,
    pub date: Option<NaiveDate>,
}

/// Cut-off date for daily reports: today's report is assumed not to be out yet.
pub fn as_of_date(today: NaiveDate, offset_days: i64) -> NaiveDate {
    today - Duration::days(offset_days)
}

/// Date between the first `(` and the first `)`, e.g. "Benzene market daily (Nov 03, 2024)".
/// A `)` before the `(` leaves no token.
pub fn date_from_link_text(text: &str) -> Option<NaiveDate> {
    let open = text.find('(')?;
    let close = text.find(')')?;
    if close <= open {
        return None;
    }
    let token = &text[open + 1..close];
    if !DATE_TOKEN.is_match(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, LINK_DATE_FORMAT).ok()
}

pub fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url).map_err(|e| ReportError::Url {
        url: base_url.to_string(),
        message: e.to_string(),
    })
}

/// Visible text the way the portal titles read: each text node trimmed, blanks dropped, rest concatenated.
fn anchor_text(anchor: ElementRef<'_>) -> String {
    anchor
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Applies `strategy` to the anchors of `html`. Pure; never fails.
pub fn select_link(
    html: &str,
    title_prefix: &str,
    base_url: &Url,
    strategy: LinkStrategy,
) -> Option<SelectedLink> {
    let document = Html::parse_document(html);
    let mut best: Option<SelectedLink> = None;

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let text = anchor_text(anchor);
        if !text.starts_with(title_prefix) {
            continue;
        }
        let Some(url) = anchor
            .value()
            .attr("href")
            .and_then(|href| base_url.join(href.trim()).ok())
        else {
            debug!("Skipping '{}': no usable href", text);
            continue;
        };

        match strategy {
            LinkStrategy::FirstMatch => {
                return Some(SelectedLink {
                    url: url.to_string(),
                    date: date_from_link_text(&text),
                });
            }
            LinkStrategy::LatestDated { as_of } => {
                let Some(date) = date_from_link_text(&text) else {
                    debug!("Skipping '{}': no parsable date", text);
                    continue;
                };
                if date > as_of {
                    continue;
                }
                // strictly newer only, so the first of equal dates wins
                let newer = best
                    .as_ref()
                    .and_then(|b| b.date)
                    .map_or(true, |current| date > current);
                if newer {
                    best = Some(SelectedLink {
                        url: url.to_string(),
                        date: Some(date),
                    });
                }
            }
        }
    }

    best
}

/// Fetches one listing page and applies `strategy` to it.
fn fetch_and_select(
    fetcher: &dyn PageFetcher,
    listing_url: &str,
    title_prefix: &str,
    base_url: &Url,
    strategy: LinkStrategy,
) -> Result<Option<SelectedLink>> {
    let html = fetcher.get_page(listing_url)?;
    Ok(select_link(&html, title_prefix, base_url, strategy))
}

/// Newest report on or before `as_of_date` whose title starts with `title_prefix`.
pub fn resolve_daily(
    fetcher: &dyn PageFetcher,
    listing_url: &str,
    title_prefix: &str,
    as_of_date: NaiveDate,
    base_url: &Url,
) -> Result<Option<String>> {
    let strategy = LinkStrategy::LatestDated { as_of: as_of_date };
    Ok(fetch_and_select(fetcher, listing_url, title_prefix, base_url, strategy)?.map(|l| l.url))
}

/// First report in page order whose title starts with `title_prefix`.
pub fn resolve_weekly(
    fetcher: &dyn PageFetcher,
    listing_url: &str,
    title_prefix: &str,
    base_url: &Url,
) -> Result<Option<String>> {
    let strategy = LinkStrategy::FirstMatch;
    Ok(fetch_and_select(fetcher, listing_url, title_prefix, base_url, strategy)?.map(|l| l.url))
}

/// Resolves one category with the rule its cadence calls for.
#[instrument(skip(fetcher, base_url))]
pub fn resolve_category(
    fetcher: &dyn PageFetcher,
    category: ReportCategory,
    as_of: NaiveDate,
    base_url: &Url,
) -> Result<Option<ReportLink>> {
    let strategy = LinkStrategy::for_cadence(category.cadence(), as_of);
    let link = fetch_and_select(
        fetcher,
        category.listing_url(),
        category.title_prefix(),
        base_url,
        strategy,
    )?
    .map(|selected| ReportLink {
        category,
        url: selected.url,
        observed_date: selected.date,
    });

    match &link {
        Some(l) => info!("Resolved {} -> {}", category, l.url),
        None => info!("No matching link for {}", category),
    }
    Ok(link)
}
