use rust_decimal::Decimal;
use thiserror::Error;

pub type Cell = Option<Decimal>;

#[derive(Debug, PartialEq, Error)]
pub enum TableError {
    #[error("row has {actual} cells, table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Named numeric columns, row major. A `None` cell is a missing value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Table {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        self.rows.push(row);

        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = Cell> + '_, TableError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;

        Ok(self.rows.iter().map(move |row| row[index]))
    }

    /// First row whose `key_column` equals `key`.
    pub fn find_row(&self, key_column: &str, key: Decimal) -> Result<Option<&[Cell]>, TableError> {
        let index = self
            .column_index(key_column)
            .ok_or_else(|| TableError::UnknownColumn(key_column.to_string()))?;

        Ok(self
            .rows
            .iter()
            .find(|row| row[index] == Some(key))
            .map(Vec::as_slice))
    }

    /// New table holding only `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Table {
            columns: names.iter().map(|name| name.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&index| row[index]).collect())
                .collect(),
        })
    }

    pub fn head(&self, count: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(count).cloned().collect(),
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.columns.join("  "))?;
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(value) => value.to_string(),
                    None => "NaN".to_string(),
                })
                .collect();
            writeln!(f, "{}", cells.join("  "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["year", "a", "b"]);
        table.push_row(vec![Some(dec!(1990)), Some(dec!(1.5)), None]).unwrap();
        table.push_row(vec![Some(dec!(1991)), Some(dec!(2.5)), Some(dec!(3))]).unwrap();
        table
    }

    #[test]
    fn test_push_row_width_mismatch() {
        let mut table = Table::new(["year", "a"]);
        assert_eq!(
            table.push_row(vec![Some(dec!(1))]),
            Err(TableError::RowWidth { expected: 2, actual: 1 })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_select_reorders_columns() {
        let selected = sample().select(&["b", "year"]).unwrap();

        assert_eq!(selected.columns(), &["b".to_string(), "year".to_string()]);
        assert_eq!(selected.rows()[0], vec![None, Some(dec!(1990))]);
    }

    #[test]
    fn test_select_unknown_column() {
        assert_eq!(
            sample().select(&["year", "c"]),
            Err(TableError::UnknownColumn("c".to_string()))
        );
    }

    #[test]
    fn test_find_row() {
        let table = sample();

        let row = table.find_row("year", dec!(1991)).unwrap().unwrap();
        assert_eq!(row[2], Some(dec!(3)));
        assert!(table.find_row("year", dec!(2023)).unwrap().is_none());
    }
}
