use std::path::PathBuf;

use larder_core::{ContextId, ExportId, LedgerEntry};
use larder_store::EntryRepo;
use tracing::instrument;

use crate::error::EngineError;
use crate::reply::{self, display_date};

/// Export intent: hand the full ledger (insertion order) to the sink
/// and reply with the artifact's URL. An empty ledger still produces a
/// header-only artifact.
pub(crate) fn run(
    repo: &EntryRepo,
    sink: &dyn ExportSink,
    context: &ContextId,
) -> Result<String, EngineError> {
    let entries = repo.query_all(context)?;
    let artifact = sink.materialize(&entries)?;
    Ok(reply::export_ready(&artifact))
}

/// Reference to a materialized export: where it lives on disk and the
/// URL a user can fetch it from.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub id: ExportId,
    pub file_name: String,
    pub url: String,
}

/// Materializes a row set as a downloadable tabular file. The engine
/// treats this as opaque; the CSV implementation below is the one the
/// server ships.
pub trait ExportSink: Send + Sync {
    fn materialize(&self, entries: &[LedgerEntry]) -> Result<ExportArtifact, EngineError>;
}

/// Writes exports as CSV files into a directory served by the download
/// route. Each export gets a fresh id-based file name, so concurrent
/// exports never clobber each other.
pub struct CsvExportSink {
    dir: PathBuf,
    public_base_url: String,
}

impl CsvExportSink {
    pub fn new(dir: PathBuf, public_base_url: impl Into<String>) -> Self {
        Self {
            dir,
            public_base_url: public_base_url.into(),
        }
    }
}

impl ExportSink for CsvExportSink {
    #[instrument(skip(self, entries), fields(rows = entries.len()))]
    fn materialize(&self, entries: &[LedgerEntry]) -> Result<ExportArtifact, EngineError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| EngineError::Export(format!("create export dir: {e}")))?;

        let id = ExportId::new();
        let file_name = format!("{id}.csv");
        let path = self.dir.join(&file_name);

        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| EngineError::Export(format!("open {}: {e}", path.display())))?;
        writer
            .write_record(["Item", "Quantity", "Unit", "Date"])
            .map_err(|e| EngineError::Export(e.to_string()))?;
        for entry in entries {
            writer
                .write_record([
                    entry.item.as_str(),
                    &number_field(entry.quantity),
                    entry.unit.as_str(),
                    &display_date(entry.date),
                ])
                .map_err(|e| EngineError::Export(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| EngineError::Export(e.to_string()))?;

        let url = format!(
            "{}/export/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        );
        Ok(ExportArtifact { id, file_name, url })
    }
}

/// Plain numeric field for the spreadsheet: no grouping separators, no
/// trailing `.0` on whole values.
fn number_field(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    }
}
