//! HTML table extraction.
//!
//! Every `<table>` on a page becomes one [`ReportTable`]. Header rows come
//! from `<thead>`, or from the leading all-`<th>` rows when there is no
//! `<thead>`. Spanned cells are repeated into every column/row they cover
//! within their own row group; `<tfoot>` rows follow the body rows.

use crate::types::ReportTable;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("static selector"));

/// Upper bound on a single colspan/rowspan, so a malformed attribute cannot blow up a row.
const MAX_SPAN: usize = 1000;

struct RawCell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

struct RawRow {
    cells: Vec<RawCell>,
}

impl RawRow {
    fn all_header_cells(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.is_header)
    }
}

/// A table's direct rows, split by row group. Bare `<tr>` children count as body rows.
#[derive(Default)]
struct RowGroups {
    head: Vec<RawRow>,
    body: Vec<RawRow>,
    foot: Vec<RawRow>,
}

/// Extracts every table in document order. A page without tables yields an empty list.
pub fn extract_tables(html: &str) -> Vec<ReportTable> {
    let document = Html::parse_document(html);
    let tables: Vec<ReportTable> = document
        .select(&TABLE_SELECTOR)
        .filter_map(parse_table)
        .collect();
    debug!("Extracted {} tables", tables.len());
    tables
}

fn parse_table(table: ElementRef<'_>) -> Option<ReportTable> {
    let mut groups = collect_rows(table);
    if groups.head.is_empty() {
        let leading = groups.body.iter().take_while(|r| r.all_header_cells()).count();
        groups.head = groups.body.drain(..leading).collect();
    }

    // spans never cross a row group boundary
    let header_rows = expand_spans(&groups.head);
    let mut body_rows = expand_spans(&groups.body);
    body_rows.extend(expand_spans(&groups.foot));

    let width = header_rows
        .iter()
        .chain(&body_rows)
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    if width == 0 {
        return None;
    }

    let headers = dedupe_headers(combine_headers(&header_rows, width));
    Some(ReportTable::new(headers, body_rows))
}

/// Direct rows of this table only; rows belonging to nested tables are left to their own table.
fn collect_rows(table: ElementRef<'_>) -> RowGroups {
    let mut groups = RowGroups::default();

    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => groups.body.push(read_row(child)),
            "thead" => groups.head.extend(child_rows(child)),
            "tbody" => groups.body.extend(child_rows(child)),
            "tfoot" => groups.foot.extend(child_rows(child)),
            _ => {}
        }
    }

    groups
}

fn child_rows(group: ElementRef<'_>) -> Vec<RawRow> {
    group
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(read_row)
        .collect()
}

fn read_row(tr: ElementRef<'_>) -> RawRow {
    let cells = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|cell| RawCell {
            text: cell_text(cell),
            is_header: cell.value().name() == "th",
            colspan: span_attr(cell, "colspan"),
            rowspan: span_attr(cell, "rowspan"),
        })
        .collect();
    RawRow { cells }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn span_attr(cell: ElementRef<'_>, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
        .min(MAX_SPAN)
}

/// Lays the rows out on a grid, repeating colspan values across and rowspan values down.
fn expand_spans(rows: &[RawRow]) -> Vec<Vec<String>> {
    // column -> (value, rows still to fill)
    let mut carried: Vec<Option<(String, usize)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out: Vec<String> = Vec::new();
        let mut cells = row.cells.iter();

        loop {
            let col = out.len();
            if let Some(Some((text, remaining))) = carried.get_mut(col) {
                out.push(text.clone());
                *remaining -= 1;
                if *remaining == 0 {
                    carried[col] = None;
                }
                continue;
            }

            let Some(cell) = cells.next() else { break };
            for _ in 0..cell.colspan {
                let col = out.len();
                if cell.rowspan > 1 {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    carried[col] = Some((cell.text.clone(), cell.rowspan - 1));
                }
                out.push(cell.text.clone());
            }
        }

        // Spans from earlier rows that reach past this row's last cell
        for col in out.len()..carried.len() {
            if let Some((text, remaining)) = carried[col].as_mut() {
                out.resize(col, String::new());
                out.push(text.clone());
                *remaining -= 1;
                if *remaining == 0 {
                    carried[col] = None;
                }
            }
        }

        grid.push(out);
    }

    grid
}

/// One name per column. Multiple header rows are joined; blank names fall back to the column index.
fn combine_headers(header_rows: &[Vec<String>], width: usize) -> Vec<String> {
    (0..width)
        .map(|col| {
            let mut parts: Vec<&str> = Vec::new();
            for row in header_rows {
                if let Some(text) = row.get(col).filter(|t| !t.is_empty()) {
                    if parts.last() != Some(&text.as_str()) {
                        parts.push(text);
                    }
                }
            }
            if parts.is_empty() {
                col.to_string()
            } else {
                parts.join(" ")
            }
        })
        .collect()
}

/// Repeated names become `name`, `name.1`, `name.2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let out = if *count == 0 {
                name
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            out
        })
        .collect()
}
