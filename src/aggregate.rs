//! Group-by sum aggregations.
//!
//! Groups are keyed by the display text of the grouping cell, so `2024` and
//! `2024.0` in a categorical `Year` column land in the same group. Rows whose
//! key is missing are dropped; missing measure cells add nothing to a sum.
//! Group order is first appearance unless a ranking re-sorts it.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    capability::Requirements,
    data::{self, Value},
    error::Unavailable,
    frame::Table,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: String,
    pub values: Vec<f64>,
}

/// Distinct group keys with one summed value per measure column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub group_column: String,
    pub measure_columns: Vec<String>,
    pub rows: Vec<GroupRow>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.key.as_str()).collect()
    }

    /// `(key, value)` pairs for one measure, in row order.
    pub fn series(&self, measure: usize) -> Vec<(String, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.values.get(measure).map(|v| (row.key.clone(), *v)))
            .collect()
    }

    pub fn measure_index(&self, name: &str) -> Option<usize> {
        self.measure_columns.iter().position(|m| m == name)
    }

    /// Divides every sum by `divisor`, e.g. 1000 to report in thousands.
    pub fn scaled(mut self, divisor: f64) -> Self {
        for row in &mut self.rows {
            for value in &mut row.values {
                *value /= divisor;
            }
        }
        self
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                std::iter::once(row.key.clone())
                    .chain(row.values.iter().map(|v| data::format_measure(*v)))
                    .collect()
            })
            .collect()
    }

    pub fn headers(&self) -> Vec<String> {
        std::iter::once(self.group_column.clone())
            .chain(self.measure_columns.iter().cloned())
            .collect()
    }
}

/// Sums `measure_column` per distinct `group_column` value and keeps the `n`
/// largest groups. Groups with equal sums keep their first-seen order.
pub fn top_n(
    table: &Table,
    group_column: &str,
    measure_column: &str,
    n: usize,
) -> Result<AggregationResult, Unavailable> {
    let mut result = group_sums(table, group_column, &[measure_column])?;
    // `sort_by` is stable, which keeps ties in first-seen order.
    result
        .rows
        .sort_by(|a, b| b.values[0].total_cmp(&a.values[0]));
    result.rows.truncate(n);
    Ok(result)
}

/// One row per distinct category in first-seen order, summing each measure.
pub fn trend_by_category(
    table: &Table,
    category_column: &str,
    measure_columns: &[&str],
) -> Result<AggregationResult, Unavailable> {
    group_sums(table, category_column, measure_columns)
}

/// Totals of several numeric columns, one row per column, keyed by column name.
pub fn column_totals(
    table: &Table,
    columns: &[&str],
    label: &str,
    measure_name: &str,
) -> Result<AggregationResult, Unavailable> {
    Requirements::new()
        .measures(columns.iter().copied())
        .check(table)?;
    let rows = columns
        .iter()
        .map(|name| GroupRow {
            key: name.to_string(),
            values: vec![table.column(name).map_or(0.0, |column| sum_cells(&column.values))],
        })
        .collect();
    Ok(AggregationResult {
        group_column: label.to_string(),
        measure_columns: vec![measure_name.to_string()],
        rows,
    })
}

fn group_sums(
    table: &Table,
    group_column: &str,
    measure_columns: &[&str],
) -> Result<AggregationResult, Unavailable> {
    Requirements::new()
        .column(group_column)
        .measures(measure_columns.iter().copied())
        .check(table)?;
    let missing = || Unavailable::missing([group_column]);
    let keys = &table.column(group_column).ok_or_else(missing)?.values;
    let measures = measure_columns
        .iter()
        .map(|name| {
            table
                .column(name)
                .map(|column| &column.values)
                .ok_or_else(|| Unavailable::missing([*name]))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<GroupRow> = Vec::new();
    for (row_idx, key) in keys.iter().enumerate() {
        let Some(key) = key else {
            continue;
        };
        let key = key.as_display();
        let slot = *positions.entry(key.clone()).or_insert_with(|| {
            rows.push(GroupRow {
                key,
                values: vec![0.0; measures.len()],
            });
            rows.len() - 1
        });
        for (measure_idx, measure) in measures.iter().enumerate() {
            if let Some(value) = measure
                .get(row_idx)
                .and_then(Option::as_ref)
                .and_then(Value::as_f64)
            {
                rows[slot].values[measure_idx] += value;
            }
        }
    }

    Ok(AggregationResult {
        group_column: group_column.to_string(),
        measure_columns: measure_columns.iter().map(|m| m.to_string()).collect(),
        rows,
    })
}

fn sum_cells(values: &[Option<Value>]) -> f64 {
    values.iter().flatten().filter_map(Value::as_f64).sum()
}
