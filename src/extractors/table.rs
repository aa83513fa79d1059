// src/extractors/table.rs
use serde_json::{Map, Value};

/// A flattened spreadsheet: ordered column names plus ordered rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, padding or truncating every row to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// First `limit` rows as JSON records keyed by column name.
    pub fn head_records(&self, limit: usize) -> Vec<Value> {
        self.rows
            .iter()
            .take(limit)
            .map(|row| {
                let record: Map<String, Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(c, v)| (c.clone(), Value::String(v.clone())))
                    .collect();
                Value::Object(record)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = Table::new(
            vec!["A".into(), "B".into()],
            vec![vec!["1".into()], vec!["2".into(), "3".into(), "extra".into()]],
        );
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(1, 1), "3");
        assert_eq!(table.rows()[1].len(), 2);
        assert_eq!(table.cell(9, 0), "");
    }

    #[test]
    fn test_head_records() {
        let table = Table::new(
            vec!["Produto".into(), "Valor".into()],
            vec![
                vec!["Arroz".into(), "21,90".into()],
                vec!["Feijão".into(), "7,49".into()],
            ],
        );
        let records = table.head_records(1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Produto"], "Arroz");
        assert_eq!(records[0]["Valor"], "21,90");
    }
}
