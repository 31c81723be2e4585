//! CSV Import
//!
//! Builds a results table from a CSV export, detecting numeric columns
//! when the caller does not name them.

use std::io::Read;
use std::path::Path;

use super::compare::numeric_key;
use super::controller::{ColumnSpec, SortType, TableController, TableData};
use super::error::{TableError, TableResult};

/// CSV table importer with configurable column typing
pub struct CsvTableImporter {
    /// Whether the CSV has a header row
    has_header: bool,
    /// Column matched by the search box
    search_column: usize,
    /// Columns forced to numeric comparison; empty means auto-detect
    numeric_columns: Vec<usize>,
    /// Field delimiter
    delimiter: u8,
}

impl Default for CsvTableImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTableImporter {
    pub fn new() -> Self {
        Self {
            has_header: true,
            search_column: 0,
            numeric_columns: Vec::new(),
            delimiter: b',',
        }
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_search_column(mut self, column: usize) -> Self {
        self.search_column = column;
        self
    }

    pub fn with_numeric_column(mut self, column: usize) -> Self {
        self.numeric_columns.push(column);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read table data from any reader
    pub fn read<R: Read>(&self, reader: R) -> TableResult<TableData> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = if self.has_header {
            csv_reader.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.trim().to_string()).collect::<Vec<_>>());
        }

        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);

        if width == 0 {
            return Err(TableError::Empty);
        }

        let columns = (0..width)
            .map(|idx| {
                let title = headers
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("Column {}", idx + 1));
                ColumnSpec::new(title, self.column_type(idx, &rows))
            })
            .collect();

        tracing::debug!(rows = rows.len(), columns = width, "CSV table read");

        Ok(TableData {
            columns,
            search_column: self.search_column,
            rows,
        })
    }

    /// Read a CSV file into a ready controller
    pub fn import_file(&self, path: &Path) -> TableResult<TableController> {
        let file = std::fs::File::open(path)?;
        let data = self.read(file)?;
        Ok(TableController::from_data(&data))
    }

    fn column_type(&self, column: usize, rows: &[Vec<String>]) -> SortType {
        if !self.numeric_columns.is_empty() {
            return if self.numeric_columns.contains(&column) {
                SortType::Numeric
            } else {
                SortType::Text
            };
        }

        // Numeric when every non-empty cell carries at least one digit and
        // yields a non-zero key or is literally zero.
        let mut seen = false;
        for cell in rows.iter().filter_map(|r| r.get(column)) {
            if cell.is_empty() {
                continue;
            }
            seen = true;
            let has_digit = cell.chars().any(|c| c.is_ascii_digit());
            if !has_digit || (numeric_key(cell) == 0.0 && !is_zero(cell)) {
                return SortType::Text;
            }
        }

        if seen {
            SortType::Numeric
        } else {
            SortType::Text
        }
    }
}

fn is_zero(cell: &str) -> bool {
    cell.chars()
        .filter(|c| c.is_ascii_digit())
        .all(|c| c == '0')
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Project,Contracted,Status\n\
                       Alpha,\"12 650 000\",active\n\
                       beta,50,closed\n\
                       Gamma,0,active\n";

    #[test]
    fn test_auto_detect_columns() {
        let data = CsvTableImporter::new().read(CSV.as_bytes()).unwrap();
        assert_eq!(data.columns.len(), 3);
        assert_eq!(data.columns[0].sort, SortType::Text);
        assert_eq!(data.columns[1].sort, SortType::Numeric);
        assert_eq!(data.columns[2].sort, SortType::Text);
        assert_eq!(data.rows.len(), 3);
    }

    #[test]
    fn test_forced_numeric_columns() {
        let data = CsvTableImporter::new()
            .with_numeric_column(2)
            .read(CSV.as_bytes())
            .unwrap();
        assert_eq!(data.columns[1].sort, SortType::Text);
        assert_eq!(data.columns[2].sort, SortType::Numeric);
    }

    #[test]
    fn test_headerless_titles() {
        let data = CsvTableImporter::new()
            .with_header(false)
            .read("a;1\nb;2\n".as_bytes());
        // Default delimiter is a comma, so each line is a single cell
        let data = data.unwrap();
        assert_eq!(data.columns.len(), 1);
        assert_eq!(data.columns[0].title, "Column 1");

        let data = CsvTableImporter::new()
            .with_header(false)
            .with_delimiter(b';')
            .read("a;1\nb;2\n".as_bytes())
            .unwrap();
        assert_eq!(data.columns.len(), 2);
        assert_eq!(data.columns[1].sort, SortType::Numeric);
    }

    #[test]
    fn test_empty_input() {
        let err = CsvTableImporter::new()
            .with_header(false)
            .read("".as_bytes())
            .unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn test_import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut table = CsvTableImporter::new().import_file(&path).unwrap();
        table.sort(1, true);
        assert_eq!(table.rows()[0].cells[0], "Gamma");
    }
}
