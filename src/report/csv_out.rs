use crate::error::Result;
use crate::types::{CategoryTables, CsvAttachment, ReportCategory, ReportTable};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Spreadsheet tools need the BOM to detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `{category}_table_{index}.csv`, index starting at 1.
pub fn csv_filename(category: ReportCategory, index: usize) -> String {
    format!("{}_table_{}.csv", category.slug(), index)
}

pub fn table_to_csv(table: &ReportTable) -> Result<Vec<u8>> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(table.headers())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

/// Writes one file per table into `output_dir`, then reads each back as attachment bytes.
/// Categories without tables contribute no files.
pub fn write_csv_files(output_dir: &Path, categories: &[CategoryTables]) -> Result<Vec<CsvAttachment>> {
    fs::create_dir_all(output_dir)?;

    let mut attachments = Vec::new();
    for entry in categories {
        for (i, table) in entry.tables.iter().enumerate() {
            let filename = csv_filename(entry.category, i + 1);
            let path = output_dir.join(&filename);
            fs::write(&path, table_to_csv(table)?)?;
            debug!("Wrote {}", path.display());

            let bytes = fs::read(&path)?;
            attachments.push(CsvAttachment { filename, path, bytes });
        }
    }

    info!("Wrote {} CSV files to {}", attachments.len(), output_dir.display());
    Ok(attachments)
}
