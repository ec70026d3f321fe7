//! Parquet persistence for indicator samples
//!
//! **Columnar layout** (one row per logged sample):
//!
//! | column   | type    | meaning                              |
//! |----------|---------|--------------------------------------|
//! | `run_id` | Utf8    | owning run                           |
//! | `key`    | Utf8    | indicator key                        |
//! | `kind`   | Utf8    | `scalar` or `histogram`              |
//! | `step`   | UInt64  | global step                          |
//! | `value`  | Float64 | sample value                         |
//!
//! Histogram steps are stored as several rows sharing `(run_id, key, step)`.
//! Artifacts are not persisted.

use super::MemoryStore;
use crate::indicator::IndicatorKind;
use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Arrow schema of the sample layout.
#[must_use]
pub fn sample_schema() -> Schema {
    Schema::new(vec![
        Field::new("run_id", DataType::Utf8, false),
        Field::new("key", DataType::Utf8, false),
        Field::new("kind", DataType::Utf8, false),
        Field::new("step", DataType::UInt64, false),
        Field::new("value", DataType::Float64, false),
    ])
}

/// Load a Parquet sample file into a new [`MemoryStore`].
///
/// # Errors
/// Returns error if the file cannot be read or parsed, a required column is
/// missing or mistyped, a column holds nulls, or a `kind` is not
/// `scalar`/`histogram`.
pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    let file = File::open(path.as_ref())
        .map_err(|e| Error::StorageError(format!("Failed to open Parquet file: {e}")))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::StorageError(format!("Failed to parse Parquet file: {e}")))?;

    let reader = builder
        .build()
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet reader: {e}")))?;

    let store = MemoryStore::new();
    let mut rows = 0usize;
    for batch in reader {
        let batch = batch
            .map_err(|e| Error::StorageError(format!("Failed to read record batch: {e}")))?;
        rows += load_batch(&store, &batch)?;
    }

    tracing::info!(
        path = %path.as_ref().display(),
        rows,
        runs = store.run_count(),
        "loaded indicator samples"
    );
    Ok(store)
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| Error::StorageError(format!("Missing column: {name}")))?;
    if array.null_count() > 0 {
        return Err(Error::StorageError(format!("Column {name} contains nulls")));
    }
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::StorageError(format!(
            "Column {name} has type {:?}",
            array.data_type()
        ))
    })
}

fn load_batch(store: &MemoryStore, batch: &RecordBatch) -> Result<usize> {
    let run_ids = column::<StringArray>(batch, "run_id")?;
    let keys = column::<StringArray>(batch, "key")?;
    let kinds = column::<StringArray>(batch, "kind")?;
    let steps = column::<UInt64Array>(batch, "step")?;
    let values = column::<Float64Array>(batch, "value")?;

    for row in 0..batch.num_rows() {
        let (run_id, key, step, value) = (
            run_ids.value(row),
            keys.value(row),
            steps.value(row),
            values.value(row),
        );
        match IndicatorKind::parse(kinds.value(row)) {
            Some(IndicatorKind::Scalar) => store.log_scalar(run_id, key, step, value),
            Some(IndicatorKind::Histogram) => store.log_histogram(run_id, key, step, &[value]),
            _ => {
                return Err(Error::StorageError(format!(
                    "Unsupported indicator kind {:?} at row {row}",
                    kinds.value(row)
                )))
            }
        }
    }
    Ok(batch.num_rows())
}

/// Write every sample of `store` to a Parquet file.
///
/// # Errors
/// Returns error if the file cannot be created or written.
pub fn write_parquet<P: AsRef<Path>>(store: &MemoryStore, path: P) -> Result<()> {
    use parquet::arrow::ArrowWriter;

    let rows = store.sample_rows();
    let schema = Arc::new(sample_schema());

    let run_ids = StringArray::from_iter_values(rows.iter().map(|(id, ..)| id.run_id()));
    let keys = StringArray::from_iter_values(rows.iter().map(|(id, ..)| id.key()));
    let kinds = StringArray::from_iter_values(rows.iter().map(|(_, kind, ..)| kind.as_str()));
    let steps = UInt64Array::from_iter_values(rows.iter().map(|&(_, _, step, _)| step));
    let values = Float64Array::from_iter_values(rows.iter().map(|&(.., value)| value));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(run_ids),
        Arc::new(keys),
        Arc::new(kinds),
        Arc::new(steps),
        Arc::new(values),
    ];
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns)?;

    let file = File::create(path.as_ref())?;
    let mut writer = ArrowWriter::try_new(file, schema, None)
        .map_err(|e| Error::StorageError(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(&batch)
        .map_err(|e| Error::StorageError(format!("Failed to write record batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::StorageError(format!("Failed to finish Parquet file: {e}")))?;

    tracing::debug!(path = %path.as_ref().display(), rows = rows.len(), "wrote indicator samples");
    Ok(())
}
