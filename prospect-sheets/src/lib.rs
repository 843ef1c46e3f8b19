//! Row store collaborator: reading lead rows and writing per-row results.
//!
//! The batch driver does not care where rows live; it talks to [`RowStore`].
//! The bundled implementation is CSV-file-backed: one headered input file of
//! leads, one output file with a result line per input row, in input order.

use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column: {0}")]
    MissingColumn(String),
}

/// One lead as read from the sheet. `index` is the 1-based data-row
/// position, header excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRow {
    pub index: usize,
    pub website: String,
    pub contact_name: Option<String>,
}

/// The terminal record for one lead: the scraped (or error) cell and an
/// optional drafted outreach email.
#[derive(Debug, Clone)]
pub struct RowResult {
    pub row: LeadRow,
    pub cell: String,
    pub outreach: Option<String>,
}

#[async_trait]
pub trait RowStore: Send + Sync {
    async fn load_rows(&self) -> Result<Vec<LeadRow>, SheetError>;

    /// Persist results, one output line per input row, in input order.
    async fn write_results(&self, results: &[RowResult]) -> Result<(), SheetError>;
}

/// CSV-file-backed store. Column headers are matched case-insensitively.
pub struct CsvRowStore {
    input: PathBuf,
    output: PathBuf,
    website_column: String,
    name_column: String,
}

impl CsvRowStore {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            website_column: "website".to_string(),
            name_column: "name".to_string(),
        }
    }

    pub fn with_columns(mut self, website: &str, name: &str) -> Self {
        self.website_column = website.to_string();
        self.name_column = name.to_string();
        self
    }
}

#[async_trait]
impl RowStore for CsvRowStore {
    async fn load_rows(&self) -> Result<Vec<LeadRow>, SheetError> {
        let mut reader = csv::Reader::from_path(&self.input)?;
        let headers = reader.headers()?.clone();
        let website_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(&self.website_column))
            .ok_or_else(|| SheetError::MissingColumn(self.website_column.clone()))?;
        // The name column is optional; rows without it still get scraped.
        let name_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(&self.name_column));

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let website = record.get(website_idx).unwrap_or("").trim().to_string();
            let contact_name = name_idx
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            rows.push(LeadRow {
                index: i + 1,
                website,
                contact_name,
            });
        }
        tracing::info!(count = rows.len(), path = %self.input.display(), "loaded lead rows");
        Ok(rows)
    }

    async fn write_results(&self, results: &[RowResult]) -> Result<(), SheetError> {
        let mut writer = csv::Writer::from_path(&self.output)?;
        writer.write_record(["url", "about_content", "outreach"])?;
        for result in results {
            writer.write_record([
                result.row.website.as_str(),
                result.cell.as_str(),
                result.outreach.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;
        tracing::info!(count = results.len(), path = %self.output.display(), "wrote results");
        Ok(())
    }
}
