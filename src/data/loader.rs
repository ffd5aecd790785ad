use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{RawTable, Value};

/// File the dashboard opens on startup when no path is given.
pub const DEFAULT_DATA_FILE: &str = "USdatSt.csv";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw survey table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (the CPS extract default)
/// * `.parquet` – flat Parquet file with scalar columns
/// * `.json`    – `[{ "PESEX": 1, "AGE": 34, ... }, ...]`
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.columns,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV from any reader; the header row names the columns.
///
/// Records may be ragged: short ones are padded with missing cells and
/// extra trailing fields are ignored.
pub fn read_csv<R: std::io::Read>(input: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row: Vec<Value> = record.iter().map(guess_value_type).collect();
        row.resize(headers.len(), Value::Null);
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

fn guess_value_type(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "PESEX": 1, "HEFAMINC": 11, "PRMARSTA": 7, "AGE": 25, "ST": 6 },
///   ...
/// ]
/// ```
///
/// Columns are ordered by first appearance; keys absent from a record are missing.
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();

    Ok(RawTable::new(columns, rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => guess_value_type(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file, one scalar column per survey variable.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let values = (0..batch.num_columns())
                .map(|col_idx| extract_value(batch.column(col_idx), row))
                .collect();
            rows.push(values);
        }
    }

    Ok(RawTable::new(columns, rows))
}

/// Extract a single scalar from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        other => {
            log::warn!("Unsupported parquet column type {other:?}; treating as missing");
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_are_typed_and_blanks_are_missing() {
        let data = "PESEX,HEFAMINC,AGE,NOTE\n1,11,25.5,x\n2,,70,\n";
        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["PESEX", "HEFAMINC", "AGE", "NOTE"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], Value::Integer(1));
        assert_eq!(table.rows[0][2], Value::Float(25.5));
        assert_eq!(table.rows[0][3], Value::Text("x".into()));
        assert_eq!(table.rows[1][1], Value::Null);
        assert_eq!(table.rows[1][3], Value::Null);
    }

    #[test]
    fn ragged_csv_rows_line_up_with_the_header() {
        let data = "PESEX,HEFAMINC,PRMARSTA,AGE,ST\n1,11,7,25,6\n2,1,5,70\n1,2,3,40,6,9\n";
        let table = read_csv(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.rows.iter().all(|r| r.len() == 5));
        assert_eq!(table.rows[1][3], Value::Integer(70));
        assert_eq!(table.rows[1][4], Value::Null);
        assert_eq!(table.rows[2][4], Value::Integer(6));
    }

    #[test]
    fn json_records_union_their_keys() {
        let table = parse_json(r#"[{"PESEX": 1, "AGE": 30}, {"AGE": 41.0, "ST": 6}]"#).unwrap();

        assert_eq!(table.columns, vec!["PESEX", "AGE", "ST"]);
        assert_eq!(table.rows[0][2], Value::Null);
        assert_eq!(table.rows[1][0], Value::Null);
        assert_eq!(table.rows[1][1], Value::Float(41.0));
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(parse_json(r#"{"PESEX": 1}"#).is_err());
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("survey.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }
}
