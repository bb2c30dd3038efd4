//! Dataset ingestion: extension-dispatch loading into a [`Frame`].

use super::{Frame, Scalar};
use crate::errors::IngestError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::info;

/// Loads a dataset from `path`, dispatching on the file extension.
///
/// Supported: `.csv`, `.xlsx`, `.xls`, `.json` (array of objects).
///
/// # Errors
///
/// Returns [`IngestError::FileNotFound`] for a missing file,
/// [`IngestError::UnsupportedExtension`] for an unknown extension, and
/// [`IngestError::Parse`] wrapping the underlying cause otherwise.
pub fn load_frame(path: &Path) -> Result<Frame, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let frame = match extension.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" | "xls" => load_spreadsheet(path)?,
        "json" => load_json(path)?,
        _ => return Err(IngestError::UnsupportedExtension { extension }),
    };

    let (rows, cols) = frame.shape();
    info!(path = %path.display(), rows, cols, "loaded dataset");
    Ok(frame)
}

fn load_csv(path: &Path) -> Result<Frame, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| IngestError::parse(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| IngestError::parse(path, e))?
        .iter()
        .map(ToString::to_string)
        .collect();
    let mut frame = Frame::new(headers).map_err(|e| IngestError::parse(path, e))?;

    for record in reader.records() {
        let record = record.map_err(|e| IngestError::parse(path, e))?;
        let cells = record.iter().map(Scalar::parse).collect();
        frame.push_row(cells).map_err(|e| IngestError::parse(path, e))?;
    }
    Ok(frame)
}

fn load_spreadsheet(path: &Path) -> Result<Frame, IngestError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::parse(path, e))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::parse(path, "workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::parse(path, e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| IngestError::parse(path, "sheet has no header row"))?
        .iter()
        .map(|cell| match cell {
            Data::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    let n_cols = headers.len();
    let mut frame = Frame::new(headers).map_err(|e| IngestError::parse(path, e))?;

    for row in rows {
        let mut cells: Vec<Scalar> = row.iter().map(cell_to_scalar).collect();
        // Trailing blank cells are truncated by the reader.
        cells.resize(n_cols, Scalar::Null);
        frame.push_row(cells).map_err(|e| IngestError::parse(path, e))?;
    }
    Ok(frame)
}

fn cell_to_scalar(cell: &Data) -> Scalar {
    match cell {
        Data::Empty => Scalar::Null,
        Data::Bool(b) => Scalar::Bool(*b),
        Data::Int(i) => Scalar::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Scalar::Int(*f as i64)
            } else {
                Scalar::Float(*f)
            }
        }
        Data::String(s) => Scalar::parse(s),
        other => Scalar::Str(other.to_string()),
    }
}

fn load_json(path: &Path) -> Result<Frame, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::parse(path, e))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| IngestError::parse(path, e))?;

    let records = value
        .as_array()
        .ok_or_else(|| IngestError::parse(path, "expected a top-level JSON array of objects"))?;

    let objects = records
        .iter()
        .map(|record| {
            record.as_object().ok_or_else(|| {
                IngestError::parse(path, "expected every array element to be an object")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Column order is first-seen across all records.
    let mut columns: Vec<String> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let mut frame = Frame::new(columns.clone()).map_err(|e| IngestError::parse(path, e))?;
    for object in objects {
        let cells = columns
            .iter()
            .map(|c| object.get(c).map_or(Scalar::Null, Scalar::from_json))
            .collect();
        frame.push_row(cells).map_err(|e| IngestError::parse(path, e))?;
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_shape_and_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "data.csv",
            "city,price,qty\noslo,10.5,2\nbergen,7,4\nvoss,,1\n",
        );

        let frame = load_frame(&path).unwrap();
        assert_eq!(frame.shape(), (3, 3));
        assert_eq!(frame.rows()[0][1], Scalar::Float(10.5));
        assert_eq!(frame.rows()[1][1], Scalar::Int(7));
        assert_eq!(frame.rows()[2][1], Scalar::Null);
    }

    #[test]
    fn test_load_json_union_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[{"a": 1, "b": "x"}, {"a": 2, "c": true}]"#,
        );

        let frame = load_frame(&path).unwrap();
        assert_eq!(frame.shape(), (2, 3));
        assert_eq!(frame.columns(), &["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(frame.rows()[1][1], Scalar::Null);
        assert_eq!(frame.rows()[1][2], Scalar::Bool(true));
    }

    #[test]
    fn test_missing_file() {
        let result = load_frame(Path::new("/nonexistent/data.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.parquet", "whatever");

        let result = load_frame(&path);
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedExtension { ref extension }) if extension == "parquet"
        ));
    }

    #[test]
    fn test_parse_failure_wraps_cause() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.json", "not json at all");

        let result = load_frame(&path);
        assert!(matches!(result, Err(IngestError::Parse { .. })));
    }

    #[test]
    fn test_csv_ragged_row_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.csv", "a,b\n1,2,3\n");

        let result = load_frame(&path);
        assert!(matches!(result, Err(IngestError::Parse { .. })));
    }
}
