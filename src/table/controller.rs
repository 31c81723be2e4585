//! Table controller
//!
//! Sort and search over a fixed set of rows. Hidden rows stay in the table
//! so clearing the search restores them; sorting reorders hidden rows too.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::compare::{compare_numeric, compare_text};

/// How a column's cells are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    Numeric,
    #[default]
    Text,
}

/// Column header metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub title: String,
    #[serde(default)]
    pub sort: SortType,
}

impl ColumnSpec {
    pub fn new(title: impl Into<String>, sort: SortType) -> Self {
        Self {
            title: title.into(),
            sort,
        }
    }
}

/// Table as delivered in the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<ColumnSpec>,
    /// Column the search box matches against
    #[serde(default)]
    pub search_column: usize,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Position in the original table, stable across sorts
    pub index: usize,
    pub cells: Vec<String>,
    pub visible: bool,
}

impl Row {
    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// Active sort indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortIndicator {
    pub column: usize,
    pub ascending: bool,
}

/// Sort and search state of one results table
#[derive(Debug, Clone)]
pub struct TableController {
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
    search_column: usize,
    indicator: Option<SortIndicator>,
}

impl TableController {
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<Vec<String>>, search_column: usize) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| Row {
                index,
                cells,
                visible: true,
            })
            .collect();

        Self {
            columns,
            rows,
            search_column,
            indicator: None,
        }
    }

    pub fn from_data(data: &TableData) -> Self {
        Self::new(data.columns.clone(), data.rows.clone(), data.search_column)
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// All rows in current order, hidden ones included
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn indicator(&self) -> Option<SortIndicator> {
        self.indicator
    }

    /// Show rows whose search cell contains `term`, ignoring case.
    ///
    /// An empty term shows every row. Rows without a search cell keep their
    /// current visibility. Returns the number of visible rows.
    pub fn filter(&mut self, term: &str) -> usize {
        let needle = term.trim().to_lowercase();

        for row in &mut self.rows {
            if needle.is_empty() {
                row.visible = true;
                continue;
            }
            if let Some(cell) = row.cells.get(self.search_column) {
                row.visible = cell.to_lowercase().contains(&needle);
            }
        }

        let visible = self.visible_count();
        tracing::debug!(term = %needle, visible, "Table filtered");
        visible
    }

    /// Stable sort of all rows by `column`.
    ///
    /// Ties keep their prior relative order in both directions. Returns
    /// `false` for an unknown column, leaving the table untouched.
    pub fn sort(&mut self, column: usize, ascending: bool) -> bool {
        let Some(spec) = self.columns.get(column) else {
            tracing::debug!(column, "Sort on unknown column ignored");
            return false;
        };

        let compare: fn(&str, &str) -> Ordering = match spec.sort {
            SortType::Numeric => compare_numeric,
            SortType::Text => compare_text,
        };

        self.rows.sort_by(|a, b| {
            let ordering = compare(a.cell(column).unwrap_or(""), b.cell(column).unwrap_or(""));
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        self.indicator = Some(SortIndicator { column, ascending });
        true
    }

    /// Header click: same column flips direction, another column starts
    /// ascending.
    pub fn header_click(&mut self, column: usize) -> Option<SortIndicator> {
        let ascending = match self.indicator {
            Some(current) if current.column == column => !current.ascending,
            _ => true,
        };

        if self.sort(column, ascending) {
            self.indicator
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableController {
        TableController::new(
            vec![
                ColumnSpec::new("Name", SortType::Text),
                ColumnSpec::new("Amount", SortType::Numeric),
            ],
            vec![
                vec!["Alpha".into(), "100".into()],
                vec!["beta".into(), "50".into()],
                vec!["Gamma".into(), "100".into()],
            ],
            0,
        )
    }

    fn names(table: &TableController) -> Vec<&str> {
        table.rows().iter().map(|r| r.cells[0].as_str()).collect()
    }

    #[test]
    fn test_numeric_sort_keeps_ties() {
        let mut table = sample();
        assert!(table.sort(1, true));
        assert_eq!(names(&table), ["beta", "Alpha", "Gamma"]);

        assert!(table.sort(1, false));
        assert_eq!(names(&table), ["Alpha", "Gamma", "beta"]);
    }

    #[test]
    fn test_text_sort_reverses_exactly() {
        let mut table = sample();
        table.sort(0, true);
        let ascending: Vec<String> = names(&table).iter().map(|s| s.to_string()).collect();
        assert_eq!(ascending, ["Alpha", "beta", "Gamma"]);

        table.sort(0, false);
        let mut descending: Vec<String> = names(&table).iter().map(|s| s.to_string()).collect();
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    fn single_column(cells: &[&str]) -> TableController {
        TableController::new(
            vec![ColumnSpec::new("Name", SortType::Text)],
            cells.iter().map(|c| vec![c.to_string()]).collect(),
            0,
        )
    }

    #[test]
    fn test_text_sort_uses_alphabet_order() {
        let mut table = single_column(&["яблоко", "ёлка", "Жук", "арбуз"]);
        table.sort(0, true);
        assert_eq!(names(&table), ["арбуз", "ёлка", "Жук", "яблоко"]);

        let mut table = single_column(&["zeta", "Émile", "eagle"]);
        table.sort(0, true);
        assert_eq!(names(&table), ["eagle", "Émile", "zeta"]);
    }

    #[test]
    fn test_text_sort_case_ties_keep_order() {
        let mut table = single_column(&["ёлка", "Ёлка", "ЁЛКА"]);
        table.sort(0, true);
        assert_eq!(names(&table), ["ёлка", "Ёлка", "ЁЛКА"]);
        table.sort(0, false);
        assert_eq!(names(&table), ["ёлка", "Ёлка", "ЁЛКА"]);
    }

    #[test]
    fn test_filter() {
        let mut table = sample();
        assert_eq!(table.filter("a"), 3);
        assert_eq!(table.filter("z"), 0);
        assert!(table.rows().iter().all(|r| !r.visible));
        assert_eq!(table.filter("GAM"), 1);
        assert_eq!(table.filter(""), 3);
    }

    #[test]
    fn test_hidden_rows_are_sorted() {
        let mut table = sample();
        table.filter("gamma");
        table.sort(0, false);
        assert_eq!(names(&table), ["Gamma", "beta", "Alpha"]);
        assert_eq!(table.visible_count(), 1);
    }

    #[test]
    fn test_header_click_cycle() {
        let mut table = sample();
        let first = table.header_click(1).unwrap();
        assert_eq!(first, SortIndicator { column: 1, ascending: true });

        let second = table.header_click(1).unwrap();
        assert!(!second.ascending);

        let other = table.header_click(0).unwrap();
        assert_eq!(other, SortIndicator { column: 0, ascending: true });
    }

    #[test]
    fn test_unknown_column() {
        let mut table = sample();
        assert!(!table.sort(7, true));
        assert_eq!(table.header_click(7), None);
        assert_eq!(table.indicator(), None);
        assert_eq!(names(&table), ["Alpha", "beta", "Gamma"]);
    }

    #[test]
    fn test_table_data_deserialize() {
        let json = r#"{
            "columns": [{"title": "Project"}, {"title": "Sum", "sort": "numeric"}],
            "search_column": 0,
            "rows": [["A", "1"]]
        }"#;
        let data: TableData = serde_json::from_str(json).unwrap();
        assert_eq!(data.columns[0].sort, SortType::Text);
        assert_eq!(data.columns[1].sort, SortType::Numeric);
        let table = TableController::from_data(&data);
        assert_eq!(table.rows().len(), 1);
    }
}
