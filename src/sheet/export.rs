// src/sheet/export.rs

use anyhow::{ensure, Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs::File, path::Path, sync::Arc};
use tracing::info;

use crate::schema::{build_arrow_schema, COLUMNS};

/// Write order rows (one cell per column, sheet order) to a Snappy-compressed
/// Parquet file. Returns the number of rows written.
pub fn write_parquet<R: AsRef<[String]>>(path: impl AsRef<Path>, rows: &[R]) -> Result<usize> {
    let path = path.as_ref();
    let schema = build_arrow_schema();

    for (i, row) in rows.iter().enumerate() {
        ensure!(
            row.as_ref().len() == COLUMNS.len(),
            "row {} has {} cells, expected {}",
            i,
            row.as_ref().len(),
            COLUMNS.len()
        );
    }

    let arrays: Vec<ArrayRef> = (0..COLUMNS.len())
        .map(|c| {
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.as_ref()[c].as_str()),
            )) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building order batch")?;
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer =
        ArrowWriter::try_new(file, schema, Some(props)).context("creating Arrow writer")?;
    writer.write(&batch).context("writing order batch")?;
    writer.close().context("closing Parquet writer")?;

    info!(path = %path.display(), rows = rows.len(), "wrote parquet");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::sample_rows;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use tempfile::tempdir;

    #[test]
    fn sample_rows_round_trip_through_parquet() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("orders.parquet");
        let rows: Vec<Vec<String>> = sample_rows().into_iter().map(|r| r.into_values()).collect();
        assert_eq!(write_parquet(&path, &rows)?, 2);

        let reader = SerializedFileReader::new(File::open(&path)?)?;
        let meta = reader.metadata();
        assert_eq!(meta.file_metadata().num_rows(), 2);
        let names: Vec<String> = meta
            .file_metadata()
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names[0], "Order");
        assert_eq!(names.len(), COLUMNS.len());
        Ok(())
    }

    #[test]
    fn short_rows_are_rejected() {
        let tmp = tempdir().unwrap();
        let rows = vec![vec!["#1".to_string()]];
        assert!(write_parquet(tmp.path().join("bad.parquet"), &rows).is_err());
    }
}
