use crate::constants::NO_DATA_PLACEHOLDER;
use crate::error::Result;
use crate::types::{CategoryTables, ReportTable};
use askama::Template;

pub const REPORT_TITLE: &str = "CCFGroup Market Data Report";

pub struct SectionView<'a> {
    pub heading: &'a str,
    pub tables: &'a [ReportTable],
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct InlineReportTemplate<'a> {
    pub title: &'a str,
    pub report_date: String,
    pub sections: Vec<SectionView<'a>>,
    pub no_data: &'a str,
}

/// One heading per category, one table per extracted table, placeholder when empty.
pub fn render_inline_report(categories: &[CategoryTables], report_date: &str) -> Result<String> {
    let template = InlineReportTemplate {
        title: REPORT_TITLE,
        report_date: report_date.to_string(),
        sections: categories
            .iter()
            .map(|c| SectionView {
                heading: c.category.heading(),
                tables: &c.tables,
            })
            .collect(),
        no_data: NO_DATA_PLACEHOLDER,
    };
    Ok(template.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportCategory;

    fn table(headers: &[&str], row: &[&str]) -> ReportTable {
        ReportTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            vec![row.iter().map(|s| s.to_string()).collect()],
        )
    }

    #[test]
    fn empty_category_shows_placeholder() {
        let categories = vec![
            CategoryTables {
                category: ReportCategory::BenzeneDaily,
                link: None,
                tables: vec![table(&["Product", "Price"], &["Benzene", "1,020"])],
            },
            CategoryTables {
                category: ReportCategory::StyreneWeekly,
                link: None,
                tables: vec![],
            },
        ];
        let html = render_inline_report(&categories, "2024-11-04").unwrap();

        assert!(html.contains("<h3>Benzene Market Daily</h3>"));
        assert!(html.contains("<h4>Table 1</h4>"));
        assert!(html.contains("<th>Price</th>"));
        assert!(html.contains("<td>1,020</td>"));

        let weekly = html.find("Styrene Monomer Market Weekly").unwrap();
        assert!(html[weekly..].contains("<p>no data</p>"));
        assert_eq!(html.matches("no data").count(), 1);
    }

    #[test]
    fn cell_text_is_escaped() {
        let categories = vec![CategoryTables {
            category: ReportCategory::StyreneDaily,
            link: None,
            tables: vec![table(&["Note"], &["<script>x</script> & more"])],
        }];
        let html = render_inline_report(&categories, "2024-11-04").unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
