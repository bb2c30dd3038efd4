//! In-memory tabular frame: ordered columns over row-major scalar cells.

use super::Scalar;
use crate::errors::FrameError;
use std::fmt;

/// A tabular dataset with named, ordered columns and typed cells.
///
/// This is the primary-dataset representation that flows through the
/// pipeline: ingestion produces one, sandbox scripts transform it, and the
/// summarizer renders it into prompts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl Frame {
    /// Creates an empty frame with the given column names.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::DuplicateColumn` if a name repeats.
    pub fn new(columns: Vec<String>) -> Result<Self, FrameError> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(FrameError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Appends a row.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::RowArity` when the cell count does not match
    /// the column count.
    pub fn push_row(&mut self, cells: Vec<Scalar>) -> Result<(), FrameError> {
        if cells.len() != self.columns.len() {
            return Err(FrameError::RowArity {
                got: cells.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)` pair, reported in summaries and the final report.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    /// Index of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, FrameError> {
        self.column_index(name).ok_or_else(|| FrameError::UnknownColumn {
            name: name.to_string(),
        })
    }

    /// All values of one column, top to bottom.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::UnknownColumn` for a missing name.
    pub fn column_values(&self, name: &str) -> Result<Vec<Scalar>, FrameError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| r[idx].clone()).collect())
    }

    /// The first `n` rows as a new frame.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// A new frame with only the named columns, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::UnknownColumn` for any missing name.
    pub fn select(&self, names: &[String]) -> Result<Self, FrameError> {
        let indices = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            columns: names.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        })
    }

    /// A new frame sorted by one column.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::UnknownColumn` for a missing name.
    pub fn sort_by(&self, name: &str, descending: bool) -> Result<Self, FrameError> {
        let idx = self.require_column(name)?;
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            let ord = a[idx].compare(&b[idx]);
            if descending { ord.reverse() } else { ord }
        });
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Drops rows containing a null in any column, or in one named column.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::UnknownColumn` when `column` names a missing
    /// column.
    pub fn drop_nulls(&self, column: Option<&str>) -> Result<Self, FrameError> {
        let idx = match column {
            Some(name) => Some(self.require_column(name)?),
            None => None,
        };
        let rows = self
            .rows
            .iter()
            .filter(|r| match idx {
                Some(i) => !r[i].is_null(),
                None => !r.iter().any(Scalar::is_null),
            })
            .cloned()
            .collect();
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Keeps only rows whose mask entry is true. The mask length must
    /// equal the row count.
    #[must_use]
    pub fn retain_rows(&self, mask: &[bool]) -> Self {
        let rows = self
            .rows
            .iter()
            .zip(mask)
            .filter_map(|(r, &keep)| keep.then(|| r.clone()))
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// A new frame with `name` set to `values`, overwriting an existing
    /// column of that name or appending a new one. The value count must
    /// equal the row count.
    #[must_use]
    pub fn with_column(&self, name: &str, values: Vec<Scalar>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());
        let mut out = self.clone();
        if let Some(idx) = out.column_index(name) {
            for (row, value) in out.rows.iter_mut().zip(values) {
                row[idx] = value;
            }
        } else {
            out.columns.push(name.to_string());
            for (row, value) in out.rows.iter_mut().zip(values) {
                row.push(value);
            }
        }
        out
    }

    /// Renders the frame as a column-aligned text table, header first.
    #[must_use]
    pub fn render_table(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(String::len).collect();
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(ToString::to_string).collect())
            .collect();
        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let mut out = String::new();
        let write_row = |out: &mut String, cells: Vec<&str>| {
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                out.push_str(cell);
                for _ in cell.len()..widths[i] {
                    out.push(' ');
                }
            }
            // Trim trailing pad so rendering is stable across column widths.
            while out.ends_with(' ') {
                out.pop();
            }
            out.push('\n');
        };

        write_row(&mut out, self.columns.iter().map(String::as_str).collect());
        for row in &rendered {
            write_row(&mut out, row.iter().map(String::as_str).collect());
        }
        out.pop();
        out
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Frame {
        let mut frame = Frame::new(vec![
            "city".to_string(),
            "price".to_string(),
            "qty".to_string(),
        ])
        .unwrap();
        frame
            .push_row(vec![
                Scalar::Str("oslo".to_string()),
                Scalar::Float(10.0),
                Scalar::Int(2),
            ])
            .unwrap();
        frame
            .push_row(vec![
                Scalar::Str("bergen".to_string()),
                Scalar::Float(7.5),
                Scalar::Int(4),
            ])
            .unwrap();
        frame
            .push_row(vec![Scalar::Str("voss".to_string()), Scalar::Null, Scalar::Int(1)])
            .unwrap();
        frame
    }

    #[test]
    fn test_shape_and_lookup() {
        let frame = sample();
        assert_eq!(frame.shape(), (3, 3));
        assert_eq!(frame.column_index("price"), Some(1));
        assert_eq!(frame.column_index("missing"), None);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Frame::new(vec!["a".to_string(), "a".to_string()]);
        assert!(matches!(result, Err(FrameError::DuplicateColumn { .. })));
    }

    #[test]
    fn test_row_arity_enforced() {
        let mut frame = Frame::new(vec!["a".to_string()]).unwrap();
        let result = frame.push_row(vec![Scalar::Int(1), Scalar::Int(2)]);
        assert!(matches!(result, Err(FrameError::RowArity { .. })));
    }

    #[test]
    fn test_drop_nulls_any_column() {
        let frame = sample().drop_nulls(None).unwrap();
        assert_eq!(frame.n_rows(), 2);
    }

    #[test]
    fn test_drop_nulls_named_column() {
        let frame = sample().drop_nulls(Some("qty")).unwrap();
        assert_eq!(frame.n_rows(), 3);
        let frame = sample().drop_nulls(Some("price")).unwrap();
        assert_eq!(frame.n_rows(), 2);
    }

    #[test]
    fn test_sort_by() {
        let frame = sample().sort_by("price", false).unwrap();
        // Nulls sort first ascending.
        assert_eq!(frame.rows()[0][1], Scalar::Null);
        assert_eq!(frame.rows()[1][1], Scalar::Float(7.5));

        let frame = sample().sort_by("price", true).unwrap();
        assert_eq!(frame.rows()[0][1], Scalar::Float(10.0));
    }

    #[test]
    fn test_select_preserves_order() {
        let frame = sample()
            .select(&["qty".to_string(), "city".to_string()])
            .unwrap();
        assert_eq!(frame.columns(), &["qty".to_string(), "city".to_string()]);
        assert_eq!(frame.rows()[0][0], Scalar::Int(2));
    }

    #[test]
    fn test_with_column_appends_and_overwrites() {
        let frame = sample();
        let added = frame.with_column("total", vec![Scalar::Int(1); 3]);
        assert_eq!(added.n_cols(), 4);
        assert_eq!(added.rows()[2][3], Scalar::Int(1));

        let overwritten = added.with_column("total", vec![Scalar::Int(2); 3]);
        assert_eq!(overwritten.n_cols(), 4);
        assert_eq!(overwritten.rows()[0][3], Scalar::Int(2));
    }

    #[test]
    fn test_render_table_alignment() {
        let table = sample().head(1).render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("city"));
        assert!(lines[1].starts_with("oslo"));
    }

    #[test]
    fn test_head_clamps() {
        assert_eq!(sample().head(100).n_rows(), 3);
        assert_eq!(sample().head(1).n_rows(), 1);
    }
}
