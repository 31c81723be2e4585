//! Results table
//!
//! Client-side sorting and search over already-rendered rows.

pub mod compare;
pub mod controller;
pub mod csv_import;
pub mod error;

pub use compare::{compare_numeric, compare_text, numeric_key};
pub use controller::{ColumnSpec, Row, SortIndicator, SortType, TableController, TableData};
pub use csv_import::CsvTableImporter;
pub use error::{TableError, TableResult};
