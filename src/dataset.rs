use crate::LoadError;
use crate::types::{self, ColumnType};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Rows × named columns, loaded once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    types: Vec<ColumnType>,
}

impl Dataset {
    /// Builds a dataset from records already in memory. Header names are made
    /// unique and every column is typed, exactly as `from_path` does.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, LoadError> {
        if headers.is_empty() {
            return Err(LoadError::Empty);
        }
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(LoadError::Ragged {
                row: idx + 1,
                expected: headers.len(),
                found: row.len(),
            });
        }
        let headers = unique_headers(headers);
        let types = (0..headers.len())
            .map(|col_idx| types::infer_type(&rows, col_idx))
            .collect();
        Ok(Dataset {
            headers,
            rows,
            types,
        })
    }

    pub fn from_path(path: &Path, delimiter: u8) -> Result<Self, LoadError> {
        let file = open_file(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| LoadError::Parse(e.to_string()))?
            .iter()
            .map(String::from)
            .collect();
        if headers.is_empty() {
            return Err(LoadError::Empty);
        }
        let width = headers.len();
        let rows: Vec<Vec<String>> = rdr
            .records()
            .enumerate()
            .map(|(idx, r)| {
                let record = r.map_err(|e| LoadError::Parse(e.to_string()))?;
                if record.len() > width {
                    return Err(LoadError::Ragged {
                        row: idx + 1,
                        expected: width,
                        found: record.len(),
                    });
                }
                // Short rows are padded with missing cells.
                let mut row: Vec<String> = record.iter().map(String::from).collect();
                row.resize(width, String::new());
                Ok(row)
            })
            .collect::<Result<Vec<_>, LoadError>>()?;
        let dataset = Dataset::new(headers, rows)?;
        debug!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_type(&self, col_idx: usize) -> Option<ColumnType> {
        self.types.get(col_idx).copied()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Indices of the numeric columns, left to right.
    pub fn numeric_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_numeric())
            .map(|(idx, _)| idx)
    }

    /// Present values of a column parsed as `f64`; missing cells are skipped.
    pub fn numeric_values(&self, col_idx: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(col_idx))
            .filter(|val| !types::is_missing(val))
            .filter_map(|val| val.trim().parse::<f64>().ok())
            .filter(|val| !val.is_nan())
            .collect()
    }

    /// Cell text as shown in a table, with missing cells spelled `nan`.
    pub fn display_cell(&self, row_idx: usize, col_idx: usize) -> &str {
        match self.rows.get(row_idx).and_then(|row| row.get(col_idx)) {
            Some(val) if !types::is_missing(val) => val,
            _ => "nan",
        }
    }
}

fn open_file(path: &Path) -> Result<File, LoadError> {
    let not_found = || LoadError::NotFound {
        path: path.to_path_buf(),
    };
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(not_found()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(LoadError::Io(e)),
    }
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => not_found(),
        _ => LoadError::Io(e),
    })
}

/// Renames blank and repeated headers so every column name is unique:
/// a blank header at index 3 becomes `Unnamed: 3`, a second `x` becomes `x.1`.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let header = if header.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header
            };
            if seen.insert(header.clone()) {
                return header;
            }
            let suffix = suffixes.entry(header.clone()).or_insert(0);
            loop {
                *suffix += 1;
                let candidate = format!("{header}.{suffix}");
                if seen.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}
