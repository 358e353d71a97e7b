use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::WineRecord;
use super::schema::{self, ColumnKind};

/// Schema-level problems with an input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("column '{column}' has incompatible type {found}")]
    ColumnType { column: &'static str, found: String },

    #[error("row {row}: title is null")]
    MissingTitle { row: usize },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load wine records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – as written by `df.to_parquet()` (recommended)
/// * `.csv`     – header row with the schema column names
/// * `.json`    – `[{ "country": ..., "price": ..., ... }, ...]`
///
/// Every required column of [`schema::COLUMNS`] must be present.
pub fn load_file(path: &Path) -> Result<Vec<WineRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn check_columns<'a, I>(path: &Path, present: I) -> Result<(), LoadError>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    match schema::first_missing(present) {
        Some(column) => Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column,
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one wine per row.
/// Empty cells are read as nulls; unknown columns are ignored. Points may be
/// written as whole floats (`88.0`).
fn load_csv(path: &Path) -> Result<Vec<WineRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let names: Vec<&str> = headers.iter().collect();
    check_columns(path, names.iter().copied())?;
    log::debug!("CSV columns: {names:?}");

    reader
        .deserialize::<WineRecord>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`),
/// with the same tolerance for whole-float points as CSV:
///
/// ```json
/// [
///   { "country": "France", "variety": "Pinot Noir", "price": 30.0, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<WineRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = match root {
        JsonValue::Array(rows) => rows,
        _ => anyhow::bail!("Expected top-level JSON array"),
    };

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        check_columns(path, obj.keys().map(String::as_str))?;

        let record: WineRecord = serde_json::from_value(row).with_context(|| format!("Row {i}"))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog.
///
/// Text columns may be Utf8, LargeUtf8 or dictionary-encoded strings,
/// `price` and `points` any numeric type. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<WineRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let arrow_schema = builder.schema().clone();
    check_columns(
        path,
        arrow_schema.fields().iter().map(|f| f.name().as_str()),
    )?;
    log::debug!("Parquet schema: {arrow_schema:?}");

    let n_rows = builder.metadata().file_metadata().num_rows();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::with_capacity(usize::try_from(n_rows).unwrap_or(0));
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        records.extend(batch_to_records(&batch, offset)?);
    }
    Ok(records)
}

/// Typed views over the columns of one record batch.
struct BatchColumns {
    country: StringArray,
    variety: StringArray,
    price: Float64Array,
    points: Int64Array,
    title: StringArray,
    province: StringArray,
    region_1: StringArray,
    region_2: StringArray,
    taster_name: StringArray,
    taster_twitter_handle: StringArray,
    designation: StringArray,
    winery: StringArray,
    description: Option<StringArray>,
}

fn batch_to_records(batch: &RecordBatch, offset: usize) -> Result<Vec<WineRecord>> {
    let cols = BatchColumns {
        country: text_column(batch, schema::COUNTRY)?,
        variety: text_column(batch, schema::VARIETY)?,
        price: cast_column(batch, schema::PRICE, ColumnKind::Float)?
            .as_primitive::<Float64Type>()
            .clone(),
        points: cast_column(batch, schema::POINTS, ColumnKind::Integer)?
            .as_primitive::<Int64Type>()
            .clone(),
        title: text_column(batch, schema::TITLE)?,
        province: text_column(batch, schema::PROVINCE)?,
        region_1: text_column(batch, schema::REGION_1)?,
        region_2: text_column(batch, schema::REGION_2)?,
        taster_name: text_column(batch, schema::TASTER_NAME)?,
        taster_twitter_handle: text_column(batch, schema::TASTER_TWITTER_HANDLE)?,
        designation: text_column(batch, schema::DESIGNATION)?,
        winery: text_column(batch, schema::WINERY)?,
        description: match batch.schema().index_of(schema::DESCRIPTION) {
            Ok(_) => Some(text_column(batch, schema::DESCRIPTION)?),
            Err(_) => None,
        },
    };

    (0..batch.num_rows())
        .map(|row| -> Result<WineRecord> {
            let title = text_at(&cols.title, row)
                .ok_or(LoadError::MissingTitle { row: offset + row })?;
            Ok(WineRecord {
                country: text_at(&cols.country, row),
                variety: text_at(&cols.variety, row),
                price: cols
                    .price
                    .is_valid(row)
                    .then(|| cols.price.value(row))
                    .filter(|p| !p.is_nan()),
                points: cols.points.is_valid(row).then(|| cols.points.value(row)),
                title,
                province: text_at(&cols.province, row),
                region_1: text_at(&cols.region_1, row),
                region_2: text_at(&cols.region_2, row),
                taster_name: text_at(&cols.taster_name, row),
                taster_twitter_handle: text_at(&cols.taster_twitter_handle, row),
                designation: text_at(&cols.designation, row),
                winery: text_at(&cols.winery, row),
                description: cols.description.as_ref().and_then(|d| text_at(d, row)),
            })
        })
        .collect()
}

// -- Arrow helpers --

/// Cast the named column to the Arrow type backing `kind`.
fn cast_column(batch: &RecordBatch, name: &'static str, kind: ColumnKind) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("record batch missing '{name}' column"))?;
    let col = batch.column(idx);

    let target = match kind {
        ColumnKind::Text => DataType::Utf8,
        ColumnKind::Float => DataType::Float64,
        ColumnKind::Integer => DataType::Int64,
    };
    let source = col.data_type();
    let compatible = match kind {
        ColumnKind::Text => can_cast_types(source, &target),
        _ => source.is_numeric() || *source == DataType::Null,
    };
    if !compatible {
        return Err(LoadError::ColumnType {
            column: name,
            found: format!("{source:?}"),
        }
        .into());
    }

    cast(col, &target).with_context(|| format!("casting '{name}' to {target:?}"))
}

fn text_column(batch: &RecordBatch, name: &'static str) -> Result<StringArray> {
    Ok(cast_column(batch, name, ColumnKind::Text)?
        .as_string::<i32>()
        .clone())
}

fn text_at(arr: &StringArray, row: usize) -> Option<String> {
    arr.is_valid(row).then(|| arr.value(row).to_string())
}
