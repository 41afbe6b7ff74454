//! Parquet persistence of resolved items.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arrow::record_batch::RecordBatch;
use duedate_core::ledger::{ledger_schema, results_to_batch};
use duedate_core::{ComplianceItem, DueDateResult};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tempfile::NamedTempFile;
use tracing::info;

/// Read every batch of a ledger file.
pub fn read_ledger(path: &Path) -> anyhow::Result<Vec<RecordBatch>> {
    let file = File::open(path).with_context(|| format!("opening ledger {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches: Result<Vec<RecordBatch>, _> = reader.collect();
    Ok(batches?)
}

/// Append resolved items to the ledger, creating it if needed.
///
/// Parquet files cannot be appended in place, so existing rows are read
/// back and rewritten into a sibling temp file that replaces the ledger
/// only once it is complete. A failed append leaves the old ledger intact.
pub fn append_to_ledger(
    path: &Path,
    rows: &[(ComplianceItem, DueDateResult)],
) -> anyhow::Result<usize> {
    let mut batches = if path.exists() {
        read_ledger(path)?
    } else {
        Vec::new()
    };
    batches.push(results_to_batch(rows)?);

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;

    let schema = Arc::new(ledger_schema());
    let mut writer = ArrowWriter::try_new(tmp.as_file_mut(), Arc::clone(&schema), None)?;
    for batch in &batches {
        // Read-back batches may carry file metadata on their schema.
        let batch = RecordBatch::try_new(Arc::clone(&schema), batch.columns().to_vec())?;
        writer.write(&batch)?;
    }
    writer.close()?;
    tmp.persist(path)
        .with_context(|| format!("replacing ledger {}", path.display()))?;

    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    info!(path = %path.display(), appended = rows.len(), total, "ledger written");
    Ok(total)
}
