//! Column-major in-memory table.

use std::collections::HashSet;

use anyhow::{Result, ensure};

use crate::{data::Value, schema::ColumnType};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub values: Vec<Option<Value>>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, values: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            column_type,
            values,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn is_numeric(&self) -> bool {
        self.column_type == ColumnType::Numeric
    }
}

/// Every column has the same length and column names are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, |column| column.values.len());
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            ensure!(
                seen.insert(column.name.as_str()),
                "Duplicate column name '{}'",
                column.name
            );
            ensure!(
                column.values.len() == row_count,
                "Column '{}' has {} value(s) but the table has {} row(s)",
                column.name,
                column.values.len(),
                row_count
            );
        }
        Ok(Self { columns, row_count })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns
            .get(column)
            .and_then(|c| c.values.get(row))
            .and_then(Option::as_ref)
    }

    pub fn row(&self, row: usize) -> Vec<Option<&Value>> {
        self.columns
            .iter()
            .map(|c| c.values.get(row).and_then(Option::as_ref))
            .collect()
    }

    /// Rewrites every column in place. `f` may replace cells and tags but must
    /// not change a column's length or name.
    pub fn map_columns<F>(self, f: F) -> Table
    where
        F: FnMut(Column) -> Column,
    {
        let row_count = self.row_count;
        let columns = self.columns.into_iter().map(f).collect::<Vec<_>>();
        debug_assert!(columns.iter().all(|c| c.values.len() == row_count));
        Table { columns, row_count }
    }

    /// Copies the given rows, in the given order, into a new table.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                column_type: column.column_type,
                values: rows
                    .iter()
                    .filter_map(|&idx| column.values.get(idx).cloned())
                    .collect(),
            })
            .collect();
        Table {
            columns,
            row_count: rows.iter().filter(|&&idx| idx < self.row_count).count(),
        }
    }

    pub fn head(&self, limit: usize) -> Table {
        let rows = (0..self.row_count.min(limit)).collect::<Vec<_>>();
        self.select_rows(&rows)
    }
}
