//! Upload parsing - CSV and Excel bytes → Dataset

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::{Number, Value};

use crate::error::IngestError;
use crate::types::{Dataset, Record};

/// Source format accepted by the ingest endpoint, classified by filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Excel,
}

impl SourceKind {
    /// Classify a filename by its extension: case-insensitive, text after
    /// the last `.`. A filename with no dot is unsupported.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Parse uploaded bytes into a dataset: one record per data row, keyed by
/// the header row's column names in source order.
pub fn read_dataset(kind: SourceKind, bytes: &[u8]) -> Result<Dataset, IngestError> {
    match kind {
        SourceKind::Csv => read_csv(bytes),
        SourceKind::Excel => read_excel(bytes),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Dataset, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyOrCorrupt);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Processing(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    // A whitespace-only stream parses to a vacuous header row.
    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::EmptyOrCorrupt);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| IngestError::Processing(e.to_string()))?;
        let mut record = Record::new();
        for (idx, name) in headers.iter().enumerate() {
            // Short rows pad with null; cells past the header are dropped.
            let value = row.get(idx).map_or(Value::Null, parse_cell);
            record.insert(name.clone(), value);
        }
        records.push(record);
    }

    Ok(Dataset::new(records))
}

/// Light scalar inference for delimited text, matching what a typical
/// tabular reader produces: null, bool, integer, float, else string.
fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        // NaN and infinity have no JSON number form; keep them as text.
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }

    Value::String(raw.to_string())
}

fn read_excel(bytes: &[u8]) -> Result<Dataset, IngestError> {
    // A zero-byte or truncated container fails to open at all.
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|_| IngestError::EmptyOrCorrupt)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IngestError::EmptyOrCorrupt)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Processing(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        // Readable workbook with a blank first sheet: no rows, no error.
        return Ok(Dataset::default());
    };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(col, cell)| match cell {
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => b.to_string(),
            _ => format!("col_{}", col),
        })
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        for (idx, name) in headers.iter().enumerate() {
            let value = row.get(idx).map_or(Value::Null, convert_cell);
            record.insert(name.clone(), value);
        }
        records.push(record);
    }

    Ok(Dataset::new(records))
}

fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Number::from_f64(dt.as_f64()).map_or(Value::Null, Value::Number),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    // ==================== SourceKind Tests ====================

    #[test]
    fn test_from_filename_allowed_extensions() {
        assert_eq!(SourceKind::from_filename("data.csv"), Some(SourceKind::Csv));
        assert_eq!(
            SourceKind::from_filename("data.xlsx"),
            Some(SourceKind::Excel)
        );
        assert_eq!(
            SourceKind::from_filename("data.xls"),
            Some(SourceKind::Excel)
        );
    }

    #[test]
    fn test_from_filename_case_insensitive() {
        assert_eq!(SourceKind::from_filename("DATA.CSV"), Some(SourceKind::Csv));
        assert_eq!(
            SourceKind::from_filename("report.XlSx"),
            Some(SourceKind::Excel)
        );
    }

    #[test]
    fn test_from_filename_uses_last_extension() {
        assert_eq!(
            SourceKind::from_filename("backup.csv.txt"),
            None,
            "only the text after the last dot counts"
        );
        assert_eq!(
            SourceKind::from_filename("backup.txt.csv"),
            Some(SourceKind::Csv)
        );
    }

    #[test]
    fn test_from_filename_rejected() {
        assert_eq!(SourceKind::from_filename("data.txt"), None);
        assert_eq!(SourceKind::from_filename("data.pdf"), None);
        assert_eq!(SourceKind::from_filename("no_extension"), None);
        assert_eq!(SourceKind::from_filename("trailing_dot."), None);
    }

    // ==================== CSV Tests ====================

    #[test]
    fn test_csv_basic() {
        let bytes = b"name,age\nAnn,7\nBob,9\n";
        let dataset = read_dataset(SourceKind::Csv, bytes).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns(), vec!["name", "age"]);
        assert_eq!(dataset.records()[0]["name"], json!("Ann"));
        assert_eq!(dataset.records()[0]["age"], json!(7));
        assert_eq!(dataset.records()[1]["name"], json!("Bob"));
    }

    #[test]
    fn test_csv_scalar_inference() {
        let bytes = b"s,i,f,b,e\nhello,42,1.5,true,\n";
        let dataset = read_dataset(SourceKind::Csv, bytes).unwrap();
        let rec = &dataset.records()[0];

        assert_eq!(rec["s"], json!("hello"));
        assert_eq!(rec["i"], json!(42));
        assert_eq!(rec["f"], json!(1.5));
        assert_eq!(rec["b"], json!(true));
        assert_eq!(rec["e"], Value::Null);
    }

    #[test]
    fn test_csv_short_rows_pad_with_null() {
        let bytes = b"a,b,c\n1,2\n";
        let dataset = read_dataset(SourceKind::Csv, bytes).unwrap();
        let rec = &dataset.records()[0];

        assert_eq!(rec["a"], json!(1));
        assert_eq!(rec["b"], json!(2));
        assert_eq!(rec["c"], Value::Null);
    }

    #[test]
    fn test_csv_header_only_yields_zero_records() {
        let dataset = read_dataset(SourceKind::Csv, b"name,age\n").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns(), Vec::<String>::new());
    }

    #[test]
    fn test_csv_zero_bytes_is_empty_or_corrupt() {
        let err = read_dataset(SourceKind::Csv, b"").unwrap_err();
        assert!(matches!(err, IngestError::EmptyOrCorrupt));
    }

    #[test]
    fn test_csv_blank_line_is_empty_or_corrupt() {
        let err = read_dataset(SourceKind::Csv, b"\n").unwrap_err();
        assert!(matches!(err, IngestError::EmptyOrCorrupt));
    }

    #[test]
    fn test_csv_nan_stays_text() {
        let bytes = b"v\nNaN\n";
        let dataset = read_dataset(SourceKind::Csv, bytes).unwrap();
        assert_eq!(dataset.records()[0]["v"], json!("NaN"));
    }

    // ==================== Excel Tests ====================

    #[test]
    fn test_excel_zero_bytes_is_empty_or_corrupt() {
        let err = read_dataset(SourceKind::Excel, b"").unwrap_err();
        assert!(matches!(err, IngestError::EmptyOrCorrupt));
    }

    #[test]
    fn test_excel_garbage_is_empty_or_corrupt() {
        let err = read_dataset(SourceKind::Excel, b"not a zip archive").unwrap_err();
        assert!(matches!(err, IngestError::EmptyOrCorrupt));
    }

    #[test]
    fn test_convert_cell_kinds() {
        assert_eq!(convert_cell(&Data::Empty), Value::Null);
        assert_eq!(convert_cell(&Data::String("x".into())), json!("x"));
        assert_eq!(convert_cell(&Data::Int(3)), json!(3));
        assert_eq!(convert_cell(&Data::Float(2.5)), json!(2.5));
        assert_eq!(convert_cell(&Data::Bool(true)), json!(true));
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-01-01".into())),
            json!("2024-01-01")
        );
    }
}
